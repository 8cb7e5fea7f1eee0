//! Check execution engine.
//!
//! - [`CheckExecutor`] runs one monitor to a single [`CheckResult`](crate::monitor::CheckResult)
//! - [`Coordinator`] runs a batch in parallel or sequential mode
//! - [`aggregate`] folds batch results into run-level counts

mod aggregate;
mod coordinator;
mod executor;

pub use aggregate::{aggregate, RunReport, RunSummary};
pub use coordinator::Coordinator;
pub use executor::CheckExecutor;
