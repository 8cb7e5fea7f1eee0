//! Engine configuration methods for hmon.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{EngineConfig, EngineConfigBuilder, ExecutionMode};
use crate::error::ConfigError;
use crate::DEFAULT_TIMEOUT_MS;

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Load a configuration from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// ```toml
    /// default_timeout_ms = 30000
    /// mode = "sequential"
    /// payload_dir = "./requests"
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        toml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Timeout used for monitors without their own.
    ///
    /// A zero value falls back to [`DEFAULT_TIMEOUT_MS`].
    pub fn default_timeout(&self) -> Duration {
        match self.default_timeout_ms {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            millis => Duration::from_millis(millis),
        }
    }

    /// Concurrency bound with a zero limit raised to one
    pub fn concurrency_limit(&self) -> Option<usize> {
        self.max_concurrency.map(|limit| limit.max(1))
    }
}

impl EngineConfigBuilder {
    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }

    pub fn default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.default_timeout_ms = timeout_ms;
        self
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn sequential(self) -> Self {
        self.mode(ExecutionMode::Sequential)
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = Some(limit);
        self
    }

    pub fn payload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.payload_dir = dir.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }
}
