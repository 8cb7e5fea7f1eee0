//! Engine configuration for hmon.
//!
//! This module defines the settings that drive check execution. Monitor
//! definitions themselves are supplied by the caller.

mod methods;
mod types;

pub use types::{EngineConfig, EngineConfigBuilder, ExecutionMode};
