//! CoreAudio client for macOS
//!
//! Devices are identified by their HAL name. Applications that follow the
//! system default input are re-routed by CoreAudio itself, so switching only
//! sets `kAudioHardwarePropertyDefaultInputDevice`.

use async_trait::async_trait;
use coreaudio::audio_unit::macos_helpers::{
    get_audio_device_ids, get_audio_device_supports_scope, get_device_name,
};
use coreaudio::audio_unit::Scope;
use coreaudio::sys::{
    kAudioHardwarePropertyDefaultInputDevice, kAudioObjectPropertyElementMaster,
    kAudioObjectPropertyScopeGlobal, kAudioObjectSystemObject, AudioDeviceID,
    AudioObjectPropertyAddress, AudioObjectSetPropertyData,
};
use micswitch_core::domain::audio::{
    AudioError, AudioSourceList, AudioSystemClient, Result, SwitchReport,
};
use micswitch_core::domain::config::Config;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub struct CoreAudioClient {
    timeout: Duration,
    set_source_timeout: Duration,
}

impl CoreAudioClient {
    /// Fails on anything but macOS
    pub fn new(config: &Config) -> Result<Self> {
        if !cfg!(target_os = "macos") {
            return Err(AudioError::Platform(
                "CoreAudioClient can only be used on macOS".to_string(),
            ));
        }

        Ok(Self {
            timeout: config.pactl_timeout(),
            set_source_timeout: config.set_source_timeout(),
        })
    }
}

/// Run a blocking HAL call on the blocking pool, bounded by `timeout`
async fn bounded<T, F>(operation: &str, timeout: Duration, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(AudioError::OsError(format!(
            "{operation} panicked: {join_error}"
        ))),
        Err(_) => Err(AudioError::Timeout {
            command: operation.to_string(),
            timeout,
        }),
    }
}

/// Input-capable devices as (id, name), in HAL order
fn input_devices() -> Result<Vec<(AudioDeviceID, String)>> {
    let device_ids = get_audio_device_ids()
        .map_err(|e| AudioError::OsError(format!("Failed to get audio devices: {e:?}")))?;

    let devices = device_ids
        .into_iter()
        .filter(|id| get_audio_device_supports_scope(*id, Scope::Input).unwrap_or(false))
        .filter_map(|id| match get_device_name(id) {
            Ok(name) => Some((id, name)),
            Err(e) => {
                warn!(device_id = id, error = ?e, "Skipping device without a name");
                None
            }
        })
        .collect();

    Ok(devices)
}

fn set_default_input(device_id: AudioDeviceID) -> Result<()> {
    let address = AudioObjectPropertyAddress {
        mSelector: kAudioHardwarePropertyDefaultInputDevice,
        mScope: kAudioObjectPropertyScopeGlobal,
        mElement: kAudioObjectPropertyElementMaster,
    };

    // SAFETY: the address is valid for the duration of the call and the
    // payload is a single AudioDeviceID, matching the declared size.
    let status = unsafe {
        AudioObjectSetPropertyData(
            kAudioObjectSystemObject,
            &address,
            0,
            std::ptr::null(),
            std::mem::size_of::<AudioDeviceID>() as u32,
            &device_id as *const AudioDeviceID as *const _,
        )
    };

    if status != 0 {
        return Err(AudioError::OsError(format!(
            "Setting default input device failed with status {status}"
        )));
    }
    Ok(())
}

#[async_trait]
impl AudioSystemClient for CoreAudioClient {
    fn backend(&self) -> &'static str {
        "coreaudio"
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<AudioSourceList> {
        let devices = bounded("enumerate input devices", self.timeout, input_devices).await?;
        debug!(count = devices.len(), "Enumerated input devices");
        Ok(AudioSourceList::from_names(
            devices.into_iter().map(|(_, name)| name),
        ))
    }

    #[instrument(skip(self))]
    async fn switch_to(&self, name: &str) -> Result<SwitchReport> {
        let devices = bounded("enumerate input devices", self.timeout, input_devices).await?;
        let device_id = devices
            .into_iter()
            .find(|(_, device_name)| device_name == name)
            .map(|(id, _)| id)
            .ok_or_else(|| AudioError::DeviceNotFound(name.to_string()))?;

        bounded("set default input device", self.set_source_timeout, move || {
            set_default_input(device_id)
        })
        .await?;

        info!(source = name, device_id, "Default input device set");
        Ok(SwitchReport::new(name))
    }
}
