//! Check handlers for hmon.
//!
//! This module contains the pieces of a single check: building and sending
//! the HTTP request, evaluating assertions against the body, and validating
//! monitor specs before they reach the engine.

pub mod http;
pub mod validation;

pub use http::{build_request, evaluate_assertions, perform_http_request, FetchedResponse};
pub use validation::{
    validate_batch, validate_monitor, validate_run, ValidationError, ValidationErrors,
};
