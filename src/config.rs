// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load and validate configuration from a TOML file.
///
/// Credentials have no usable defaults, so a missing or invalid file is an
/// error rather than a silent fallback.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(AppError::config(format!(
            "Config file not found at {}",
            path.display()
        )));
    }

    let config = Config::load(path)?;
    config.validate()?;
    Ok(config)
}
