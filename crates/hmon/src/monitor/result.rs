use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::spec::MonitorSpec;
use crate::error::CheckError;

/// Category of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    PayloadRead,
    RequestConstruction,
    Transport,
    Timeout,
    Assertion,
    InvalidPattern,
}

impl From<&CheckError> for FailureKind {
    fn from(error: &CheckError) -> Self {
        match error {
            CheckError::PayloadRead { .. } => FailureKind::PayloadRead,
            CheckError::RequestConstruction(_) => FailureKind::RequestConstruction,
            CheckError::Transport(_) => FailureKind::Transport,
            CheckError::Timeout { .. } => FailureKind::Timeout,
            CheckError::Assertion { .. } => FailureKind::Assertion,
            CheckError::InvalidPattern { .. } => FailureKind::InvalidPattern,
        }
    }
}

/// Outcome of a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Success,
    Failure { kind: FailureKind, reason: String },
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Success)
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            CheckOutcome::Success => None,
            CheckOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CheckOutcome::Success => None,
            CheckOutcome::Failure { reason, .. } => Some(reason),
        }
    }
}

impl From<&CheckError> for CheckOutcome {
    fn from(error: &CheckError) -> Self {
        CheckOutcome::Failure { kind: error.into(), reason: error.to_string() }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Success => write!(f, "success"),
            CheckOutcome::Failure { .. } => write!(f, "failure"),
        }
    }
}

/// Result of executing exactly one [`MonitorSpec`]
///
/// Results are only created by the executor and cannot be changed afterwards.
#[derive(Debug, Clone)]
pub struct CheckResult {
    monitor: Arc<MonitorSpec>,
    latency_ms: u64,
    outcome: CheckOutcome,
    checked_at: DateTime<Utc>,
}

impl CheckResult {
    pub(crate) fn success(monitor: Arc<MonitorSpec>, latency_ms: u64) -> Self {
        Self { monitor, latency_ms, outcome: CheckOutcome::Success, checked_at: Utc::now() }
    }

    pub(crate) fn failure(monitor: Arc<MonitorSpec>, error: &CheckError, latency_ms: u64) -> Self {
        Self { monitor, latency_ms, outcome: error.into(), checked_at: Utc::now() }
    }

    /// The spec this result was produced for
    pub fn monitor(&self) -> &Arc<MonitorSpec> {
        &self.monitor
    }

    /// Whether this result belongs to exactly this spec instance
    pub fn is_for(&self, monitor: &Arc<MonitorSpec>) -> bool {
        Arc::ptr_eq(&self.monitor, monitor)
    }

    /// Milliseconds from dispatch until the body was read, or until the
    /// failing assertion. Zero if no response was obtained.
    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    pub fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    /// Flat view of the result for report writers
    pub fn record(&self) -> CheckRecord<'_> {
        CheckRecord {
            name: &self.monitor.name,
            description: self.monitor.description.as_deref(),
            url: &self.monitor.url,
            latency_ms: self.latency_ms,
            status: if self.is_success() { "success" } else { "failure" },
            failure_kind: self.outcome.kind(),
            error: self.outcome.reason(),
            checked_at: self.checked_at,
        }
    }
}

impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}

/// Serializable row describing one [`CheckResult`]
#[derive(Debug, Clone, Serialize)]
pub struct CheckRecord<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub url: &'a str,
    pub latency_ms: u64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub checked_at: DateTime<Utc>,
}

/// Results for one [`Batch`](super::Batch), frozen once the batch completes
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    name: String,
    results: Vec<CheckResult>,
}

impl BatchResult {
    pub(crate) fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self { name: name.into(), results: Vec::with_capacity(capacity) }
    }

    pub(crate) fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Find the result for a monitor by name
    pub fn get(&self, monitor_name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|result| result.monitor.name == monitor_name)
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
