//! Application configuration.
//!
//! Values come from, in increasing priority: built-in defaults, a TOML
//! file, the `STRICTLY_HANOI_DB` environment variable, and command-line
//! flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strictly_hanoi::{DEFAULT_PACE, DiskCount};
use tracing::{debug, info, instrument};

/// Config file read when no path is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "strictly_hanoi.toml";

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "STRICTLY_HANOI_DB";

/// Settings for the game front ends.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(deny_unknown_fields)]
pub struct HanoiConfig {
    /// Disks stacked when the front end starts.
    #[serde(default)]
    disk_count: DiskCount,

    /// Delay between solver moves, in milliseconds.
    #[serde(default = "default_pace_ms")]
    solution_pace_ms: u64,

    /// SQLite file holding best records.
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Log file written while the terminal UI owns the screen.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_pace_ms() -> u64 {
    u64::try_from(DEFAULT_PACE.as_millis()).unwrap_or(1000)
}

fn default_database_path() -> String {
    "strictly_hanoi.db".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_hanoi.log")
}

impl Default for HanoiConfig {
    fn default() -> Self {
        Self {
            disk_count: DiskCount::default(),
            solution_pace_ms: default_pace_ms(),
            database_path: default_database_path(),
            log_file: default_log_file(),
        }
    }
}

impl HanoiConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML, unknown keys or values
    /// out of range.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(disk_count = %config.disk_count, pace_ms = config.solution_pace_ms, "Config loaded");
        Ok(config)
    }

    /// Resolves the configuration for a run.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read when present and defaults are used otherwise. The
    /// [`DATABASE_ENV`] variable then overrides the database path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file is given but unreadable, or any
    /// file read fails to parse.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        Ok(match std::env::var(DATABASE_ENV) {
            Ok(db) if !db.trim().is_empty() => {
                debug!(database_path = %db, "Database path from environment");
                config.with_database_path(db)
            }
            _ => config,
        })
    }

    /// Delay between solver moves.
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.solution_pace_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.solution_pace_ms == 0 {
            return Err(ConfigError::new("solution_pace_ms must be positive"));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::new("database_path must not be empty"));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
