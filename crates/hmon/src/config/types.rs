//! Engine configuration types for hmon.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_TIMEOUT_MS, USER_AGENT};

/// How the checks of a batch are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Every check of a batch runs concurrently
    #[default]
    Parallel,
    /// Checks run one at a time, in input order
    Sequential,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Parallel => write!(f, "parallel"),
            ExecutionMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Configuration options for the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timeout for monitors that do not set one, in milliseconds
    pub default_timeout_ms: u64,

    pub mode: ExecutionMode,

    /// Upper bound on checks in flight per batch in parallel mode.
    /// `None` runs every check of a batch at once.
    pub max_concurrency: Option<usize>,

    /// Base directory payload references are resolved against
    pub payload_dir: PathBuf,

    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            mode: ExecutionMode::Parallel,
            max_concurrency: None,
            payload_dir: PathBuf::from("."),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_1 = |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
            writeln!(f, "  {label}: {value}")
        };

        writeln!(f, "Engine Configuration:")?;
        write_1(f, "Default timeout", &format_args!("{} ms", self.default_timeout().as_millis()))?;
        write_1(f, "Mode", &self.mode)?;
        match self.max_concurrency {
            Some(limit) => write_1(f, "Max concurrency", &limit)?,
            None => write_1(f, "Max concurrency", &"unbounded")?,
        }
        write_1(f, "Payload directory", &self.payload_dir.display())?;
        write_1(f, "User agent", &self.user_agent)?;

        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    pub(crate) config: EngineConfig,
}
