//! Error types for the hmon engine.
//!
//! Per-check failures are [`CheckError`]s and are always turned into data
//! (a failed [`CheckResult`](crate::monitor::CheckResult)) before they leave
//! the executor. [`EngineError`] covers defects of the engine itself.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Terminal failure of a single monitor check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to read payload {path}: {source}")]
    PayloadRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build request: {0}")]
    RequestConstruction(String),

    #[error("{0}")]
    Transport(String),

    #[error("timeout after {millis} ms")]
    Timeout { millis: u64 },

    #[error("assertion failed for regex `{pattern}`")]
    Assertion { pattern: String },

    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors raised by the engine rather than by an individual check.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("batch `{batch}` collected {received} of {expected} results")]
    MissingResults { batch: String, expected: usize, received: usize },

    #[error("batch `{0}` is included more than once in the run")]
    DuplicateBatch(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CheckError {
    /// Build a transport error, keeping the whole source chain in the message
    pub(crate) fn transport(error: &reqwest::Error) -> Self {
        let mut message = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        CheckError::Transport(message)
    }
}
