use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{CheckError, EngineError};
use crate::handlers::{build_request, evaluate_assertions, perform_http_request};
use crate::monitor::{CheckResult, MonitorSpec};
use crate::observer::{notify, DiagnosticObserver};
use crate::payload::{FsPayloadStore, PayloadStore};

/// A failed check together with the latency to report for it
type Failed = (CheckError, u64);

/// Raw bytes seen during one check, handed to the observer
#[derive(Default)]
struct Exchange {
    request: Option<Vec<u8>>,
    response: Option<Vec<u8>>,
}

/// Executes single monitor checks
///
/// Every call to [`execute`](Self::execute) yields exactly one result; errors
/// never escape as `Err`.
pub struct CheckExecutor {
    client: Client,
    payloads: Arc<dyn PayloadStore>,
    default_timeout: Duration,
}

impl CheckExecutor {
    /// Create an executor reading payloads from the file system
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(EngineError::Client)?;

        Ok(Self {
            client,
            payloads: Arc::new(FsPayloadStore),
            default_timeout: config.default_timeout(),
        })
    }

    /// Replace the payload source
    pub fn with_payload_store(mut self, payloads: Arc<dyn PayloadStore>) -> Self {
        self.payloads = payloads;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Run one check to completion or timeout.
    ///
    /// `base_dir` is only used to resolve the monitor's payload reference. The
    /// observer, if any, is called exactly once before returning.
    pub async fn execute(
        &self,
        monitor: Arc<MonitorSpec>,
        base_dir: &Path,
        observer: Option<&dyn DiagnosticObserver>,
    ) -> CheckResult {
        let mut exchange = Exchange::default();

        let result = match self.run(&monitor, base_dir, &mut exchange).await {
            Ok(latency_ms) => {
                info!(monitor = %monitor.name, latency_ms, "Check succeeded");
                CheckResult::success(monitor.clone(), latency_ms)
            }
            Err((error, latency_ms)) => {
                warn!(monitor = %monitor.name, latency_ms, "Check failed: {error}");
                CheckResult::failure(monitor.clone(), &error, latency_ms)
            }
        };

        if let Some(observer) = observer {
            notify(
                observer,
                &monitor.name,
                exchange.request.as_deref(),
                exchange.response.as_deref(),
            );
        }

        result
    }

    async fn run(
        &self,
        monitor: &MonitorSpec,
        base_dir: &Path,
        exchange: &mut Exchange,
    ) -> Result<u64, Failed> {
        let payload = match monitor.payload() {
            Some(reference) => {
                let bytes =
                    self.payloads.read(base_dir, reference).await.map_err(|error| (error, 0))?;
                exchange.request = Some(bytes.clone());
                Some(bytes)
            }
            None => None,
        };

        let request =
            build_request(&self.client, monitor, payload).map_err(|error| (error, 0))?;
        let timeout = monitor.effective_timeout(self.default_timeout);

        debug!("Dispatching {} {} with timeout {:?}", request.method(), request.url(), timeout);

        let started = Instant::now();
        let mut call = tokio::spawn(perform_http_request(self.client.clone(), request, started));

        let fetched = match tokio::time::timeout(timeout, &mut call).await {
            Ok(Ok(Ok(fetched))) => fetched,
            Ok(Ok(Err(error))) => return Err((error, 0)),
            Ok(Err(join_error)) => {
                let error = CheckError::Transport(format!("request task failed: {join_error}"));
                return Err((error, 0));
            }
            Err(_) => {
                // aborting drops the in-flight connection
                call.abort();
                let millis = timeout.as_millis() as u64;
                return Err((CheckError::Timeout { millis }, 0));
            }
        };

        let body: &[u8] = exchange.response.insert(fetched.body);

        evaluate_assertions(body, &monitor.assertions)
            .map_err(|error| (error, started.elapsed().as_millis() as u64))?;

        Ok(fetched.latency_ms)
    }
}
