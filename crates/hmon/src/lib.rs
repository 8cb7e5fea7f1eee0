//! hmon - HTTP content-assertion monitoring engine
//!
//! Runs declarative HTTP checks concurrently: each monitor issues one request,
//! optionally POSTing a payload, and passes when every configured regex
//! matches the response body. Loading monitor definitions and writing
//! reports is left to the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod monitor;
pub mod observer;
pub mod payload;

// Re-export main types
pub use config::{EngineConfig, ExecutionMode};
pub use engine::{aggregate, CheckExecutor, Coordinator, RunReport, RunSummary};
pub use error::{CheckError, ConfigError, EngineError};
pub use monitor::{Batch, BatchResult, CheckOutcome, CheckResult, FailureKind, Header, MonitorSpec};
pub use observer::{DiagnosticObserver, TracingObserver};
pub use payload::{FsPayloadStore, PayloadStore};

/// Timeout applied to monitors that do not configure one, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// User agent sent with every check
pub const USER_AGENT: &str = concat!("hmon/", env!("CARGO_PKG_VERSION"));
