use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::migration::MigrationPhase;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level for a `-v` count on top of the configured level
    pub fn raised_by(self, verbosity: u8) -> Self {
        let levels = [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];
        let current = levels.iter().position(|level| *level == self).unwrap_or(2);
        levels[(current + verbosity as usize).min(levels.len() - 1)]
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Configuration for the nuggets-media tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Which tag field is authoritative
    pub migration_phase: MigrationPhase,

    /// JSON file holding saved edit sessions
    pub session_store: PathBuf,

    /// Pretty-print JSON output
    pub pretty_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            migration_phase: MigrationPhase::DualWrite,
            session_store: PathBuf::from("nuggets-sessions.json"),
            pretty_output: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.session_store.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Session store path must not be empty".to_string(),
            ));
        }

        if self.session_store.is_dir() {
            return Err(Error::Configuration(format!(
                "Session store path {} is a directory",
                self.session_store.display()
            )));
        }

        Ok(())
    }
}
