//! Monitor specification types.
//!
//! A [`MonitorSpec`] is read-only once built. The engine shares specs through
//! `Arc` so the same spec can appear in several batches without copies.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Extra HTTP header sent with a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Definition of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSpec {
    /// Identity of the monitor in results
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Absolute URL the request is sent to
    pub url: String,

    /// Reference to request body bytes, resolved by a
    /// [`PayloadStore`](crate::payload::PayloadStore). Present means POST.
    #[serde(default)]
    pub payload_ref: Option<String>,

    /// Timeout in milliseconds, zero or negative selects the engine default
    #[serde(default)]
    pub timeout_ms: i64,

    #[serde(default)]
    pub headers: Vec<Header>,

    /// Regexes that must all match the response body. Empty means the check
    /// only verifies connectivity.
    #[serde(default)]
    pub assertions: Vec<String>,
}

impl MonitorSpec {
    /// Create a GET monitor with no headers or assertions
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            url: url.into(),
            payload_ref: None,
            timeout_ms: 0,
            headers: Vec::new(),
            assertions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Send the referenced payload as a POST body
    pub fn with_payload(mut self, payload_ref: impl Into<String>) -> Self {
        self.payload_ref = Some(payload_ref.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn with_assertion(mut self, pattern: impl Into<String>) -> Self {
        self.assertions.push(pattern.into());
        self
    }

    /// The payload reference, if one is set and non-empty
    pub fn payload(&self) -> Option<&str> {
        self.payload_ref.as_deref().filter(|reference| !reference.is_empty())
    }

    /// Resolve the timeout for this monitor against the engine default
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        if self.timeout_ms > 0 { Duration::from_millis(self.timeout_ms as u64) } else { default }
    }
}

/// A named group of monitors run together, usually one configuration file
#[derive(Debug, Clone)]
pub struct Batch {
    pub name: String,
    pub monitors: Vec<Arc<MonitorSpec>>,
}

impl Batch {
    pub fn new(name: impl Into<String>, monitors: impl IntoIterator<Item = MonitorSpec>) -> Self {
        Self { name: name.into(), monitors: monitors.into_iter().map(Arc::new).collect() }
    }

    /// Combine several batches into one, sharing the underlying specs
    pub fn merge<'a>(
        name: impl Into<String>,
        batches: impl IntoIterator<Item = &'a Batch>,
    ) -> Self {
        let monitors =
            batches.into_iter().flat_map(|batch| batch.monitors.iter().cloned()).collect();
        Self { name: name.into(), monitors }
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}
