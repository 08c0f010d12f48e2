//! Platform detection and audio client selection

use micswitch_core::domain::audio::{AudioError, AudioSystemClient, Result};
use micswitch_core::domain::config::Config;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::audio::PactlClient;

/// Operating systems micswitch knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Unsupported(&'static str),
}

impl Platform {
    /// Classify an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &'static str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            other => Platform::Unsupported(other),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => f.write_str("linux"),
            Platform::MacOs => f.write_str("macos"),
            Platform::Unsupported(os) => f.write_str(os),
        }
    }
}

/// Detect the platform this binary runs on
pub fn detect_platform() -> Platform {
    Platform::from_os(std::env::consts::OS)
}

/// Build the audio client for the current platform
///
/// Each client re-checks the OS in its constructor, so a mismatch fails here
/// instead of at the first command.
pub fn audio_client(config: &Config) -> Result<Arc<dyn AudioSystemClient>> {
    client_for(detect_platform(), config)
}

fn client_for(platform: Platform, config: &Config) -> Result<Arc<dyn AudioSystemClient>> {
    let client: Arc<dyn AudioSystemClient> = match platform {
        Platform::Linux => Arc::new(PactlClient::new(config)?),
        Platform::MacOs => mac_client(config)?,
        Platform::Unsupported(os) => {
            return Err(AudioError::Platform(format!("Unsupported platform: {os}")))
        }
    };

    info!(%platform, backend = client.backend(), "Audio client ready");
    Ok(client)
}

#[cfg(target_os = "macos")]
fn mac_client(config: &Config) -> Result<Arc<dyn AudioSystemClient>> {
    Ok(Arc::new(crate::audio::CoreAudioClient::new(config)?))
}

#[cfg(not(target_os = "macos"))]
fn mac_client(_config: &Config) -> Result<Arc<dyn AudioSystemClient>> {
    Err(AudioError::Platform(
        "CoreAudioClient can only be used on macOS".to_string(),
    ))
}
