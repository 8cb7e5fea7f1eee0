//! HTTP check handling for hmon.
//!
//! This module handles HTTP check requests and responses.

mod extract;
mod request;

pub use extract::evaluate_assertions;
pub use request::{build_request, perform_http_request, FetchedResponse};
