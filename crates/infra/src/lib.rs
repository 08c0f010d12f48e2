//! Platform implementations of the micswitch audio client

pub mod audio;
pub mod platform;

pub use platform::{audio_client, detect_platform, Platform};
