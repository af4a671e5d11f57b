//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/gedstats/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/gedstats/` (~/.config/gedstats/)
//! - State/Logs: `$XDG_STATE_HOME/gedstats/` (~/.local/state/gedstats/)
//!
//! The statistics database itself belongs to the host genealogy application;
//! its path is supplied by the caller, never derived here.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Statistics tunables
    #[serde(default)]
    pub stats: StatsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Statistics tunables
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Minutes of inactivity that ends an editing session
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: u32,

    /// Minimum shared records for a collaboration edge
    #[serde(default = "default_min_shared_records")]
    pub min_shared_records: u64,

    /// Trailing window size for edit-velocity moving averages
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,

    /// Number of entries in largest-changes rankings
    #[serde(default = "default_largest_changes_limit")]
    pub largest_changes_limit: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: default_session_gap_minutes(),
            min_shared_records: default_min_shared_records(),
            moving_average_window: default_moving_average_window(),
            largest_changes_limit: default_largest_changes_limit(),
        }
    }
}

fn default_session_gap_minutes() -> u32 {
    30
}

fn default_min_shared_records() -> u64 {
    3
}

fn default_moving_average_window() -> usize {
    7
}

fn default_largest_changes_limit() -> usize {
    20
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/gedstats/config.toml` (~/.config/gedstats/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("gedstats").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/gedstats/` (~/.local/state/gedstats/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("gedstats")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/gedstats/gedstats.log` (~/.local/state/gedstats/gedstats.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("gedstats.log")
    }
}
