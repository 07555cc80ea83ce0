//! Tracing bootstrap for the mock backend binary.

use std::env;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,portfolio_mock_server=debug,tower_http=debug";

/// Install the global subscriber.
///
/// Filter precedence: `RUST_LOG`, then `PORTFOLIO_LOG`, then the default.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(filter_from_env())
        .try_init();
    if let Err(err) = installed {
        tracing::debug!(%err, "keeping the already installed subscriber");
    }
}

fn filter_from_env() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    env::var("PORTFOLIO_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
