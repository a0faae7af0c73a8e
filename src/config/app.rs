//! Application configuration loading from config.toml
//!
//! The file seeds the requester roster and, on a fresh install, the first
//! super administrator. It also controls where exports are written and how
//! often the live board re-evaluates cutoff locks.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Directory CSV exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Seconds between periodic board refreshes
    #[serde(default = "default_board_refresh_secs")]
    pub board_refresh_secs: u64,
    /// Requester names to make sure exist on start
    #[serde(default)]
    pub roster: Vec<String>,
    /// Account created when no administrator exists yet
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials of the first super administrator
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapAdmin {
    /// Login name
    pub username: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Login pin
    pub pin: String,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

const fn default_board_refresh_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            board_refresh_secs: default_board_refresh_secs(),
            roster: Vec::new(),
            bootstrap_admin: None,
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `CONFIG_PATH` (default `./config.toml`).
///
/// A missing file is not an error: defaults are used and a warning is logged.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!("Config file {} not found, using defaults", path);
        return Ok(AppConfig::default());
    }
    load_config(path)
}
