mod database;
mod logging;

pub use database::init_database;
pub use logging::init_logging;

use stubzone_domain::{CliOverrides, Config};
use tracing::error;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    Ok(config)
}
