mod logging;

pub use logging::init_logging;

use netstack_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;

    info!(
        nameservers = config.dns.nameservers.len(),
        attempts = config.dns.attempts,
        timeout_ms = config.dns.timeout_ms,
        "Configuration loaded"
    );

    Ok(config)
}
