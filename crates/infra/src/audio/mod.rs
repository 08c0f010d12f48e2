//! Platform-specific audio system clients
//!
//! - Linux: PulseAudio/PipeWire through the `pactl` command-line tool
//! - macOS: CoreAudio HAL

pub mod command;
pub mod pactl;

#[cfg(target_os = "macos")]
pub mod core_audio;

pub use command::{CommandRunner, TokioCommandRunner};
pub use pactl::PactlClient;

#[cfg(target_os = "macos")]
pub use core_audio::CoreAudioClient;
