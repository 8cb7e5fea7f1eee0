//! Shared tracing setup for hmon binaries and tests.

mod tracing;

pub use self::tracing::{init_tracing, init_tracing_with, try_init_tracing};
