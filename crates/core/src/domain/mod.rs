//! Domain entities and business rules

pub mod audio;
pub mod config;

pub use audio::{
    AudioError, AudioSource, AudioSourceList, AudioSystemClient, Result, SwitchReport,
};
pub use config::{Config, ConfigError, ConfigFile, ConfigManager};
