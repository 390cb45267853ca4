pub mod types;

use crate::error::{ConfigError, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".sectool.toml";

/// Get the global config file path (~/.sectool.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Load configuration from an explicit file, the global file, or defaults.
///
/// An explicit file must exist and parse. A broken global file is reported
/// and ignored.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    if let Some(global) = global_config_path()
        && global.exists()
    {
        match read_config(&global) {
            Ok(config) => return Ok(config),
            Err(e) => warn!("Ignoring global config: {}", e),
        }
    }

    debug!("Using default configuration");
    Ok(types::Config::default())
}

fn read_config(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
