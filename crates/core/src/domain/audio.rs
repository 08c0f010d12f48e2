//! Audio input abstractions and domain models
//!
//! This module defines the platform-agnostic view of microphones. Concrete
//! clients for PulseAudio (`pactl`) and CoreAudio live in the `infra` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while listing or switching audio inputs
#[derive(Debug, Error)]
pub enum AudioError {
    /// User input rejected before reaching the audio system
    #[error("{0}")]
    Validation(String),

    /// Unsupported OS, or a client built for another OS
    #[error("Platform error: {0}")]
    Platform(String),

    /// The audio server or its control tool is not present
    #[error("Audio system unavailable: {0}")]
    Unavailable(String),

    /// Requested audio source was not found
    #[error("Audio source not found: {0}")]
    DeviceNotFound(String),

    /// External command exited with a failure or could not be spawned
    #[error("Command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    /// External command did not finish within its budget
    #[error("Command `{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// Native audio API returned an error status
    #[error("OS error: {0}")]
    OsError(String),
}

pub type Result<T> = std::result::Result<T, AudioError>;

/// Identifier prefixes used by PulseAudio/PipeWire for capture devices
const PULSE_INPUT_PREFIXES: &[&str] = &["alsa_input.", "bluez_input.", "bluez_source."];

/// Upper bound on the length of a derived display name, in characters
pub const MAX_DISPLAY_NAME_CHARS: usize = 60;

/// One audio input device as reported by the audio system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioSource {
    /// Opaque device identifier understood by the audio system
    pub name: String,
    /// Ordinal position in the enumeration
    pub index: usize,
}

impl AudioSource {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Human-readable label derived from the raw identifier.
    ///
    /// `alsa_input.usb-Blue_Yeti.analog-stereo` becomes `usb-Blue Yeti`.
    /// Names without a known prefix (e.g. CoreAudio device names) are only
    /// cleaned of underscores. Never empty.
    pub fn display_name(&self) -> String {
        let mut label = self.name.as_str();

        if let Some(stripped) = PULSE_INPUT_PREFIXES
            .iter()
            .find_map(|prefix| label.strip_prefix(prefix))
        {
            label = match stripped.rsplit_once('.') {
                Some((device, _profile)) if !device.is_empty() => device,
                _ => stripped,
            };
        }

        let label = truncate_chars(label.replace('_', " ").trim(), MAX_DISPLAY_NAME_CHARS);
        if label.is_empty() {
            truncate_chars(&self.name, MAX_DISPLAY_NAME_CHARS)
        } else {
            label
        }
    }

    /// Case-insensitive substring match on the raw or display name.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.display_name().to_lowercase().contains(needle)
    }
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Ordered collection of sources, unique by `name`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioSourceList {
    sources: Vec<AudioSource>,
}

impl AudioSourceList {
    /// Build a list, keeping the first occurrence of every name
    pub fn new(sources: Vec<AudioSource>) -> Self {
        let mut seen = HashSet::new();
        let sources = sources
            .into_iter()
            .filter(|source| seen.insert(source.name.clone()))
            .collect();
        Self { sources }
    }

    /// Build a list from names in enumeration order, assigning ordinal indices
    /// after duplicates are dropped
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let sources = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .enumerate()
            .map(|(index, name)| AudioSource { name, index })
            .collect();
        Self { sources }
    }

    pub fn sources(&self) -> &[AudioSource] {
        &self.sources
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AudioSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.iter().any(|source| source.name == name)
    }

    pub fn into_vec(self) -> Vec<AudioSource> {
        self.sources
    }
}

impl<'a> IntoIterator for &'a AudioSourceList {
    type Item = &'a AudioSource;
    type IntoIter = std::slice::Iter<'a, AudioSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

/// Outcome of a switch: the new default plus best-effort stream migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SwitchReport {
    pub source: String,
    /// Capture streams re-routed to the new source
    pub moved_streams: Vec<u32>,
    /// Capture streams left behind, with the reason
    pub failed_streams: Vec<(u32, String)>,
}

impl SwitchReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_streams.is_empty()
    }
}

/// Capability every platform audio client provides
///
/// Calls are issued serially, one per user action.
#[async_trait]
pub trait AudioSystemClient: Send + Sync {
    /// Short backend name used in logs
    fn backend(&self) -> &'static str;

    /// List the current input devices in enumeration order.
    /// An unreachable audio subsystem yields an empty list.
    async fn list(&self) -> Result<AudioSourceList>;

    /// Make `name` the default input and migrate active capture streams to it
    async fn switch_to(&self, name: &str) -> Result<SwitchReport>;
}
