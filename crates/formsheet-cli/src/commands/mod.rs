//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod fields;
pub mod output;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use formsheet_core::models::config::FormsheetConfig;

/// `<config dir>/formsheet/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formsheet")
        .join("config.json")
}

/// Load the explicit config file, else the default one if it exists, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FormsheetConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(FormsheetConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(FormsheetConfig::from_file(&default_path)?)
    } else {
        Ok(FormsheetConfig::default())
    }
}
