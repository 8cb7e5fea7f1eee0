use std::env::var;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    Layer, Registry, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initialize tracing at INFO unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    init_tracing_with(LevelFilter::INFO);
}

/// Initialize tracing with the given default level.
///
/// Panics if a global subscriber has already been installed, like
/// `tracing_subscriber`'s own `init`.
pub fn init_tracing_with(level: LevelFilter) {
    tracing_subscriber::registry().with(build_layer(level)).init();
}

/// Install a DEBUG subscriber if none is set yet.
///
/// Meant for test harnesses where several tests race to install one.
pub fn try_init_tracing() -> bool {
    tracing_subscriber::registry().with(build_layer(LevelFilter::DEBUG)).try_init().is_ok()
}

fn build_layer(level: LevelFilter) -> Box<dyn Layer<Registry> + Send + Sync> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    // unset is the common case and selects the compact format
    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_filter(env_filter)
            .boxed(),
    }
}
