//! Shared fixtures for micswitch integration tests
//!
//! - [`ScriptedRunner`] stands in for `pactl`: canned stdout per command
//!   line, every invocation recorded.
//! - [`InMemoryClient`] is an [`AudioSystemClient`] over a fixed device list.

use async_trait::async_trait;
use micswitch_core::domain::audio::{
    AudioError, AudioSourceList, AudioSystemClient, Result, SwitchReport,
};
use micswitch_infra::audio::command::{render_command, CommandRunner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// The two devices used throughout the examples
pub const USB_MIC: &str = "alsa_input.usb-Mic.analog-stereo";
pub const BUILT_IN_MIC: &str = "alsa_input.built-in.analog-stereo";

/// Render names the way `pactl list short sources` prints them
pub fn pactl_sources(names: &[&str]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(id, name)| format!("{id}\t{name}\tPipeWire\ts16le 2ch 48000Hz\tSUSPENDED\n"))
        .collect()
}

/// Render stream ids the way `pactl list short source-outputs` prints them
pub fn pactl_source_outputs(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| format!("{id}\t1\t42\tPipeWire\tfloat32le 1ch 48000Hz\n"))
        .collect()
}

#[derive(Debug, Clone)]
enum Script {
    Stdout(String),
    Failure(String),
    Timeout,
}

/// Command runner replaying scripted responses
///
/// Unscripted commands behave like a missing binary.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRunner {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, command: &str, stdout: impl Into<String>) -> Self {
        self.script(command, Script::Stdout(stdout.into()))
    }

    pub fn fail(self, command: &str, message: impl Into<String>) -> Self {
        self.script(command, Script::Failure(message.into()))
    }

    pub fn time_out(self, command: &str) -> Self {
        self.script(command, Script::Timeout)
    }

    fn script(self, command: &str, script: Script) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(command.to_string(), script);
        self
    }

    /// Command lines in invocation order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    /// Timeout passed for the first invocation of `command`
    pub fn timeout_for(&self, command: &str) -> Option<Duration> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c == command)
            .map(|(_, timeout)| *timeout)
    }

    /// True once anything other than a listing command ran
    pub fn mutated(&self) -> bool {
        self.calls().iter().any(|c| !c.starts_with("pactl list"))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String> {
        let command = render_command(program, args);
        self.calls.lock().unwrap().push((command.clone(), timeout));

        let script = self.scripts.lock().unwrap().get(&command).cloned();
        match script {
            Some(Script::Stdout(stdout)) => Ok(stdout),
            Some(Script::Failure(message)) => Err(AudioError::CommandFailed { command, message }),
            Some(Script::Timeout) => Err(AudioError::Timeout { command, timeout }),
            None => Err(AudioError::Unavailable(format!("{program} not found"))),
        }
    }
}

/// Client over a fixed device list that records switches
#[derive(Debug, Default)]
pub struct InMemoryClient {
    names: Vec<String>,
    failure: Option<String>,
    switched: Mutex<Vec<String>>,
}

impl InMemoryClient {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Every call fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn switched(&self) -> Vec<String> {
        self.switched.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(AudioError::CommandFailed {
                command: "in-memory".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AudioSystemClient for InMemoryClient {
    fn backend(&self) -> &'static str {
        "in-memory"
    }

    async fn list(&self) -> Result<AudioSourceList> {
        self.check()?;
        Ok(AudioSourceList::from_names(self.names.iter().cloned()))
    }

    async fn switch_to(&self, name: &str) -> Result<SwitchReport> {
        self.check()?;
        if !self.names.iter().any(|n| n == name) {
            return Err(AudioError::DeviceNotFound(name.to_string()));
        }
        self.switched.lock().unwrap().push(name.to_string());
        Ok(SwitchReport::new(name))
    }
}
