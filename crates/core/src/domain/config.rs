//! Configuration management for micswitch
//!
//! This module provides:
//! - `ConfigFile`, the raw TOML representation with defaults for missing keys
//! - `Config`, the validated, immutable settings shared by every component
//! - `ConfigManager`, which resolves and loads `~/.config/micswitch/config.toml`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Raw settings as written in the config file
///
/// Timeouts are in seconds, the expiry in milliseconds. Values are not
/// checked until converted into a [`Config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Timeout for listing commands
    pub pactl_timeout: f64,

    /// Timeout for setting the default source
    pub set_source_timeout: f64,

    /// Timeout for moving each capture stream
    pub move_stream_timeout: f64,

    /// Maximum number of sources shown in the launcher
    pub max_sources_display: i64,

    /// Notification expiry
    pub notification_expire_time: i64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            pactl_timeout: 0.3,
            set_source_timeout: 0.5,
            move_stream_timeout: 0.5,
            max_sources_display: 10,
            notification_expire_time: 800,
        }
    }
}

/// Validated, immutable settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pactl_timeout: Duration,
    set_source_timeout: Duration,
    move_stream_timeout: Duration,
    max_sources_display: usize,
    notification_expire_time: u32,
}

impl Default for Config {
    fn default() -> Self {
        // The default file is valid by construction
        Self {
            pactl_timeout: Duration::from_millis(300),
            set_source_timeout: Duration::from_millis(500),
            move_stream_timeout: Duration::from_millis(500),
            max_sources_display: 10,
            notification_expire_time: 800,
        }
    }
}

impl Config {
    /// Validate raw settings. Fails on any timeout <= 0 (or non-finite),
    /// `max_sources_display < 1` or a negative expiry.
    pub fn new(file: ConfigFile) -> Result<Self> {
        Ok(Self {
            pactl_timeout: positive_seconds("pactl_timeout", file.pactl_timeout)?,
            set_source_timeout: positive_seconds("set_source_timeout", file.set_source_timeout)?,
            move_stream_timeout: positive_seconds(
                "move_stream_timeout",
                file.move_stream_timeout,
            )?,
            max_sources_display: usize::try_from(file.max_sources_display)
                .ok()
                .filter(|max| *max >= 1)
                .ok_or_else(|| {
                    ConfigError::Invalid("max_sources_display must be at least 1".to_string())
                })?,
            notification_expire_time: u32::try_from(file.notification_expire_time).map_err(
                |_| {
                    ConfigError::Invalid(
                        "notification_expire_time must be non-negative".to_string(),
                    )
                },
            )?,
        })
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Self::new(file)
    }

    pub fn pactl_timeout(&self) -> Duration {
        self.pactl_timeout
    }

    pub fn set_source_timeout(&self) -> Duration {
        self.set_source_timeout
    }

    pub fn move_stream_timeout(&self) -> Duration {
        self.move_stream_timeout
    }

    pub fn max_sources_display(&self) -> usize {
        self.max_sources_display
    }

    /// Notification expiry in milliseconds
    pub fn notification_expire_time(&self) -> u32 {
        self.notification_expire_time
    }

    /// Back to the file representation, e.g. for display
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            pactl_timeout: self.pactl_timeout.as_secs_f64(),
            set_source_timeout: self.set_source_timeout.as_secs_f64(),
            move_stream_timeout: self.move_stream_timeout.as_secs_f64(),
            max_sources_display: self.max_sources_display as i64,
            notification_expire_time: i64::from(self.notification_expire_time),
        }
    }
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        Self::new(file)
    }
}

fn positive_seconds(field: &str, seconds: f64) -> Result<Duration> {
    let micros = (seconds * 1_000_000.0).round();
    if !micros.is_finite() || micros < 1.0 {
        return Err(ConfigError::Invalid(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(Duration::from_micros(micros as u64))
}

/// Locates and loads the user configuration file
///
/// Manages `~/.config/micswitch/config.toml` on Linux,
/// `~/Library/Application Support/micswitch/config.toml` on macOS.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for the platform default location
    pub fn with_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_config_dir()?.join("config.toml")))
    }

    /// Get the default config directory path
    pub fn default_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("micswitch"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Load the configuration
    ///
    /// A missing file yields the defaults. A file that exists but does not
    /// parse or validate is an error.
    #[instrument(skip(self), fields(path = %self.config_path.display()))]
    pub fn load(&self) -> Result<Config> {
        if !self.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config = Config::from_toml(&contents)?;

        info!("Configuration loaded");
        Ok(config)
    }

    /// Write a configuration file, creating the parent directory
    #[instrument(skip(self, config), fields(path = %self.config_path.display()))]
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(&config.to_file())?;
        fs::write(&self.config_path, toml_str)?;

        debug!("Configuration saved");
        Ok(())
    }
}
