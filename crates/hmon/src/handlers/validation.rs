//! Monitor spec validation.
//!
//! The engine assumes the specs it runs are valid. Loaders call
//! [`validate_batch`] first, which collects every problem in a batch instead
//! of stopping at the first. [`validate_run`] does the same for every batch
//! of a run and also requires batch names to be unique.

use std::collections::HashSet;

use regex::Regex;
use reqwest::header::HeaderName;
use thiserror::Error;
use url::Url;

use crate::monitor::{Batch, MonitorSpec};

/// A single problem found in a monitor or batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("batch name must not be empty")]
    EmptyBatchName,

    #[error("monitor name must not be empty")]
    EmptyName,

    #[error("monitor `{0}` is defined more than once")]
    DuplicateName(String),

    #[error("batch `{0}` is included more than once")]
    DuplicateBatchName(String),

    #[error("monitor `{monitor}`: invalid url `{url}`: {reason}")]
    InvalidUrl { monitor: String, url: String, reason: String },

    #[error("monitor `{monitor}`: unsupported url scheme `{scheme}`")]
    UnsupportedScheme { monitor: String, scheme: String },

    #[error("monitor `{monitor}`: invalid header name `{header}`")]
    InvalidHeaderName { monitor: String, header: String },

    #[error("monitor `{monitor}`: invalid regex `{pattern}`: {reason}")]
    InvalidPattern { monitor: String, pattern: String, reason: String },
}

/// All problems found in one batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("batch `{batch}` has {} validation error(s)", .errors.len())]
pub struct ValidationErrors {
    pub batch: String,
    pub errors: Vec<ValidationError>,
}

/// Validate a whole batch
pub fn validate_batch(batch: &Batch) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if batch.name.trim().is_empty() {
        errors.push(ValidationError::EmptyBatchName);
    }

    let mut seen = HashSet::new();
    for monitor in &batch.monitors {
        if !monitor.name.is_empty() && !seen.insert(monitor.name.as_str()) {
            errors.push(ValidationError::DuplicateName(monitor.name.clone()));
        }
        errors.extend(validate_monitor(monitor));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { batch: batch.name.clone(), errors })
    }
}

/// Validate every batch of a run, one entry per batch with problems
pub fn validate_run(batches: &[Batch]) -> Result<(), Vec<ValidationErrors>> {
    let mut failed = Vec::new();
    let mut seen = HashSet::new();

    for batch in batches {
        let mut errors = match validate_batch(batch) {
            Ok(()) => Vec::new(),
            Err(invalid) => invalid.errors,
        };
        if !batch.name.trim().is_empty() && !seen.insert(batch.name.as_str()) {
            errors.push(ValidationError::DuplicateBatchName(batch.name.clone()));
        }
        if !errors.is_empty() {
            failed.push(ValidationErrors { batch: batch.name.clone(), errors });
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(failed)
    }
}

/// Validate a single monitor, returning every problem found
pub fn validate_monitor(monitor: &MonitorSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if monitor.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if let Err(error) = validate_url(monitor) {
        errors.push(error);
    }

    for header in &monitor.headers {
        if HeaderName::from_bytes(header.name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                monitor: monitor.name.clone(),
                header: header.name.clone(),
            });
        }
    }

    for pattern in &monitor.assertions {
        if let Err(error) = Regex::new(pattern) {
            errors.push(ValidationError::InvalidPattern {
                monitor: monitor.name.clone(),
                pattern: pattern.clone(),
                reason: error.to_string(),
            });
        }
    }

    errors
}

/// Validate URL format and scheme
fn validate_url(monitor: &MonitorSpec) -> Result<(), ValidationError> {
    let parsed = Url::parse(&monitor.url).map_err(|error| ValidationError::InvalidUrl {
        monitor: monitor.name.clone(),
        url: monitor.url.clone(),
        reason: error.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::UnsupportedScheme {
            monitor: monitor.name.clone(),
            scheme: scheme.to_string(),
        }),
    }
}
