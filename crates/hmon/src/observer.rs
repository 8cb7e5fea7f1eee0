//! Diagnostic hooks for echoing raw check traffic.
//!
//! An observer is handed to the executor per run, never stored on a
//! [`MonitorSpec`](crate::monitor::MonitorSpec), so specs stay shareable.

use std::panic::{self, AssertUnwindSafe};

use tracing::{info, warn};

/// Receives the raw bytes of every check exactly once.
///
/// Called synchronously by the executor, so implementations should be quick.
/// A panicking observer is caught and logged; it never changes the outcome.
pub trait DiagnosticObserver: Send + Sync {
    fn observe(&self, monitor_name: &str, request: Option<&[u8]>, response: Option<&[u8]>);
}

impl<F> DiagnosticObserver for F
where
    F: Fn(&str, Option<&[u8]>, Option<&[u8]>) + Send + Sync,
{
    fn observe(&self, monitor_name: &str, request: Option<&[u8]>, response: Option<&[u8]>) {
        self(monitor_name, request, response)
    }
}

/// Observer that logs requests and responses through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DiagnosticObserver for TracingObserver {
    fn observe(&self, monitor_name: &str, request: Option<&[u8]>, response: Option<&[u8]>) {
        info!(monitor = monitor_name, "Request:\n{}", render(request));
        info!(monitor = monitor_name, "Response:\n{}", render(response));
    }
}

fn render(bytes: Option<&[u8]>) -> String {
    match bytes {
        Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        None => "<none>".to_string(),
    }
}

/// Invoke an observer, swallowing any panic it raises
pub(crate) fn notify(
    observer: &dyn DiagnosticObserver,
    monitor_name: &str,
    request: Option<&[u8]>,
    response: Option<&[u8]>,
) {
    let outcome =
        panic::catch_unwind(AssertUnwindSafe(|| observer.observe(monitor_name, request, response)));

    if outcome.is_err() {
        warn!(monitor = monitor_name, "Diagnostic observer panicked, ignoring");
    }
}
