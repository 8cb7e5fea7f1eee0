//! Monitor definitions and the results produced for them.

mod result;
mod spec;

pub use result::{BatchResult, CheckOutcome, CheckRecord, CheckResult, FailureKind};
pub use spec::{Batch, Header, MonitorSpec};
