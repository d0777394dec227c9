//! Log sink setup for hosts that do not install their own subscriber.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Crate log directive for the configured verbosity.
pub fn directive(config: &Config) -> &'static str {
    if config.debug {
        "message_keys=debug"
    } else {
        "message_keys=info"
    }
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG` plus the crate
/// directive. Fails if a global subscriber is already installed.
pub fn init(config: &Config) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(directive(config).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
