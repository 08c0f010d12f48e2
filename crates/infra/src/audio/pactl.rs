//! PulseAudio / PipeWire client driven through `pactl`
//!
//! Listing parses `pactl list short sources`, whose lines look like
//!
//! ```text
//! 53\talsa_input.usb-Mic.analog-stereo\tPipeWire\ts16le 2ch 48000Hz\tSUSPENDED
//! ```
//!
//! Switching sets the default source, then moves every active capture stream
//! (`source-output`) onto it.

use async_trait::async_trait;
use micswitch_core::domain::audio::{
    AudioError, AudioSourceList, AudioSystemClient, Result, SwitchReport,
};
use micswitch_core::domain::config::Config;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::command::{CommandRunner, TokioCommandRunner};

pub const PACTL: &str = "pactl";

/// Suffix PulseAudio gives the capture side of every output sink
const MONITOR_SUFFIX: &str = ".monitor";

/// `pactl`-backed client. Linux only.
pub struct PactlClient<R = TokioCommandRunner> {
    runner: R,
    timeout: Duration,
    set_source_timeout: Duration,
    move_stream_timeout: Duration,
}

impl PactlClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_runner(config, TokioCommandRunner)
    }
}

impl<R: CommandRunner> PactlClient<R> {
    /// Fails on macOS, where `pactl` does not control the system input
    pub fn with_runner(config: &Config, runner: R) -> Result<Self> {
        if cfg!(target_os = "macos") {
            return Err(AudioError::Platform(
                "PactlClient cannot be used on macOS".to_string(),
            ));
        }

        Ok(Self {
            runner,
            timeout: config.pactl_timeout(),
            set_source_timeout: config.set_source_timeout(),
            move_stream_timeout: config.move_stream_timeout(),
        })
    }

    async fn pactl(&self, args: &[&str], timeout: Duration) -> Result<String> {
        self.runner.run(PACTL, args, timeout).await
    }

    async fn sources(&self) -> Result<AudioSourceList> {
        match self.pactl(&["list", "short", "sources"], self.timeout).await {
            Ok(stdout) => Ok(parse_sources(&stdout)),
            Err(AudioError::Unavailable(reason)) => {
                warn!(%reason, "Audio system unreachable, reporting no sources");
                Ok(AudioSourceList::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort: every stream is attempted, failures are collected
    async fn migrate_streams(&self, name: &str, report: &mut SwitchReport) {
        let stdout = match self
            .pactl(&["list", "short", "source-outputs"], self.timeout)
            .await
        {
            Ok(stdout) => stdout,
            Err(e) => {
                warn!(error = %e, "Could not list capture streams, none migrated");
                return;
            }
        };

        for stream_id in parse_stream_ids(&stdout) {
            let id = stream_id.to_string();
            match self
                .pactl(&["move-source-output", &id, name], self.move_stream_timeout)
                .await
            {
                Ok(_) => {
                    debug!(stream_id, "Moved capture stream");
                    report.moved_streams.push(stream_id);
                }
                Err(e) => {
                    warn!(stream_id, error = %e, "Failed to move capture stream");
                    report.failed_streams.push((stream_id, e.to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl<R: CommandRunner> AudioSystemClient for PactlClient<R> {
    fn backend(&self) -> &'static str {
        "pactl"
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<AudioSourceList> {
        let sources = self.sources().await?;
        debug!(count = sources.len(), "Enumerated input sources");
        Ok(sources)
    }

    #[instrument(skip(self))]
    async fn switch_to(&self, name: &str) -> Result<SwitchReport> {
        if !self.sources().await?.contains(name) {
            return Err(AudioError::DeviceNotFound(name.to_string()));
        }

        self.pactl(&["set-default-source", name], self.set_source_timeout)
            .await?;
        info!(source = name, "Default source set");

        let mut report = SwitchReport::new(name);
        self.migrate_streams(name, &mut report).await;
        Ok(report)
    }
}

/// Parse `pactl list short sources`, skipping sink monitors and malformed lines
pub fn parse_sources(stdout: &str) -> AudioSourceList {
    let names = stdout.lines().filter_map(|line| {
        let name = line.split('\t').nth(1).map(str::trim).filter(|n| !n.is_empty());
        match name {
            Some(name) if name.ends_with(MONITOR_SUFFIX) => None,
            Some(name) => Some(name.to_string()),
            None => {
                if !line.trim().is_empty() {
                    warn!(line, "Skipping unparseable pactl line");
                }
                None
            }
        }
    });

    AudioSourceList::from_names(names)
}

/// Parse the stream ids (first column) of `pactl list short source-outputs`
pub fn parse_stream_ids(stdout: &str) -> Vec<u32> {
    stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}
