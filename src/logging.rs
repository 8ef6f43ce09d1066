//! Subscriber setup for binaries embedding the catalogue model.
//!
//! The library only emits `tracing` events; nothing is printed unless the
//! host installs a subscriber. Binaries call [`init_logging`] once at startup.

use std::env;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Crate-specific filter variable, consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "HYPERCAT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr fmt subscriber. Later calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter_from_env())
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    });
}

fn filter_from_env() -> EnvFilter {
    resolve_filter(env::var(LOG_ENV).ok(), env::var("RUST_LOG").ok())
}

fn resolve_filter(crate_level: Option<String>, rust_log: Option<String>) -> EnvFilter {
    [crate_level, rust_log]
        .into_iter()
        .flatten()
        .filter(|directive| !directive.trim().is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
