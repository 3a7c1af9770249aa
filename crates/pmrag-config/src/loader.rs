//! File and `.env` loading

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{Config, ConfigError, ConfigResult};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "pmrag.toml";

/// Seed the process environment from a `.env` file.
///
/// With `path` the file must exist; without it a missing `.env` is fine.
/// Variables already set in the environment are kept.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => match dotenv::from_path(path) {
            Ok(()) => {
                info!("Loaded environment from {}", path.display());
                Some(path.to_path_buf())
            }
            Err(e) => {
                warn!("Failed to load env file {}: {}", path.display(), e);
                None
            }
        },
        None => match dotenv::dotenv() {
            Ok(found) => {
                debug!("Loaded environment from {}", found.display());
                Some(found)
            }
            Err(_) => None,
        },
    }
}

pub(crate) fn read_file(path: Option<&Path>) -> ConfigResult<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                debug!("No config file, using defaults");
                return Ok(Config::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    info!("Loaded configuration from {}", path.display());
    Config::from_toml_str(&content)
}
