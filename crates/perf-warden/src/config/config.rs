//! Configuration management for perf-warden.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{ElevationConfig, RecordingConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// perf invocation settings.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Privilege escalation settings.
    #[serde(default)]
    pub elevation: ElevationConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// The configured perf binary is NOT validated here; resolution
    /// happens when a recording starts, so a misconfigured path fails
    /// the session with a clear reason rather than blocking startup.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent
    /// corruption if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "perf-warden", "Perf-Warden").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }
}
