//! Logging setup for the CLI
//!
//! Diagnostics go to stderr so that command output on stdout stays
//! machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: `RUST_LOG` wins, then the config file, then
/// `--verbose`
pub fn filter_directive(configured: Option<&str>, verbose: bool) -> String {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        if !env.trim().is_empty() {
            return env;
        }
    }
    if let Some(configured) = configured.filter(|f| !f.trim().is_empty()) {
        return configured.to_string();
    }
    if verbose {
        "debug".to_string()
    } else {
        DEFAULT_FILTER.to_string()
    }
}

/// Install the global subscriber
///
/// An invalid directive falls back to the default level.
pub fn init(directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}
