//! Subcommands.

pub mod config;
pub mod convert;
pub mod scan;

use std::path::Path;

use tracing::debug;

use pricexl_core::PricexlConfig;

/// Load the configuration from `--config`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PricexlConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(PricexlConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(PricexlConfig::from_file(&default_path)?)
    } else {
        Ok(PricexlConfig::default())
    }
}
