//! End-to-end list and switch through the pactl client, the container and
//! the JSON command line, with `pactl` replaced by a scripted runner

#![cfg(not(target_os = "macos"))]

use micswitch_app::presentation::cli::{list_command, query_command, switch_command};
use micswitch_app::Container;
use micswitch_core::domain::config::{Config, ConfigFile};
use micswitch_infra::audio::PactlClient;
use micswitch_tests::{
    pactl_source_outputs, pactl_sources, ScriptedRunner, BUILT_IN_MIC, USB_MIC,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const LIST_SOURCES: &str = "pactl list short sources";
const LIST_STREAMS: &str = "pactl list short source-outputs";

fn devices() -> ScriptedRunner {
    ScriptedRunner::new().respond(LIST_SOURCES, pactl_sources(&[USB_MIC, BUILT_IN_MIC]))
}

fn container_with(runner: ScriptedRunner, config: Config) -> Container {
    let client = PactlClient::with_runner(&config, runner).unwrap();
    Container::with_client(config, Arc::new(client))
}

fn container(runner: ScriptedRunner) -> Container {
    container_with(runner, Config::default())
}

#[tokio::test]
async fn test_list_filters_to_usb_device() {
    let response = list_command(&container(devices()), "usb", 10).await;

    assert_eq!(response.exit_code, 0);
    assert_eq!(
        response.body,
        json!({ "sources": [{ "name": USB_MIC, "index": 0 }] })
    );
}

#[tokio::test]
async fn test_list_caps_in_enumeration_order() {
    let response = list_command(&container(devices()), "", 1).await;

    assert_eq!(
        response.body,
        json!({ "sources": [{ "name": USB_MIC, "index": 0 }] })
    );
}

#[tokio::test]
async fn test_list_pactl_failure_is_json_error() {
    let runner = ScriptedRunner::new().fail(LIST_SOURCES, "Connection failure: Connection refused");
    let response = list_command(&container(runner), "", 10).await;

    assert_eq!(response.exit_code, 1);
    let message = response.body["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to list sources:"));
    assert!(message.contains("Connection refused"));
}

#[tokio::test]
async fn test_list_timeout_is_json_error() {
    let runner = ScriptedRunner::new().time_out(LIST_SOURCES);
    let response = list_command(&container(runner), "", 10).await;

    assert_eq!(response.exit_code, 1);
    assert!(response.body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_switch_unknown_source_performs_no_mutation() {
    let runner = devices();
    let response = switch_command(&container(runner.clone()), "nonexistent").await;

    assert_eq!(response.exit_code, 1);
    assert_eq!(
        response.body,
        json!({ "error": "Audio source not found: nonexistent" })
    );
    assert!(!runner.mutated());
}

#[tokio::test]
async fn test_switch_blank_name_never_runs_pactl() {
    let runner = devices();
    let response = switch_command(&container(runner.clone()), " \t ").await;

    assert_eq!(response.exit_code, 1);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_switch_migrates_streams_best_effort() {
    let runner = devices()
        .respond(&format!("pactl set-default-source {BUILT_IN_MIC}"), "")
        .respond(LIST_STREAMS, pactl_source_outputs(&[5, 6, 7]))
        .respond(&format!("pactl move-source-output 5 {BUILT_IN_MIC}"), "")
        .fail(
            &format!("pactl move-source-output 6 {BUILT_IN_MIC}"),
            "Failure: No such entity",
        )
        .respond(&format!("pactl move-source-output 7 {BUILT_IN_MIC}"), "");

    let response = switch_command(&container(runner.clone()), BUILT_IN_MIC).await;

    assert_eq!(response.exit_code, 0);
    assert_eq!(response.body["success"], true);
    assert_eq!(
        response.body["message"],
        format!("Switched to audio source: {BUILT_IN_MIC}")
    );
    assert_eq!(response.body["failed_streams"], json!([6]));

    // Stream 7 is still attempted after 6 fails
    assert_eq!(
        runner.calls(),
        vec![
            LIST_SOURCES.to_string(),
            format!("pactl set-default-source {BUILT_IN_MIC}"),
            LIST_STREAMS.to_string(),
            format!("pactl move-source-output 5 {BUILT_IN_MIC}"),
            format!("pactl move-source-output 6 {BUILT_IN_MIC}"),
            format!("pactl move-source-output 7 {BUILT_IN_MIC}"),
        ]
    );
}

#[tokio::test]
async fn test_switch_set_default_timeout_is_failure() {
    let runner = devices().time_out(&format!("pactl set-default-source {USB_MIC}"));
    let response = switch_command(&container(runner.clone()), USB_MIC).await;

    assert_eq!(response.exit_code, 1);
    assert!(response.body["error"].as_str().unwrap().contains("timed out"));
    assert!(!runner.calls().iter().any(|c| c.contains("move-source-output")));
}

#[tokio::test]
async fn test_each_command_uses_its_own_timeout() {
    let config = Config::new(ConfigFile {
        pactl_timeout: 0.1,
        set_source_timeout: 0.2,
        move_stream_timeout: 0.3,
        ..ConfigFile::default()
    })
    .unwrap();
    let runner = devices()
        .respond(&format!("pactl set-default-source {USB_MIC}"), "")
        .respond(LIST_STREAMS, pactl_source_outputs(&[9]))
        .respond(&format!("pactl move-source-output 9 {USB_MIC}"), "");

    let response = switch_command(&container_with(runner.clone(), config), USB_MIC).await;
    assert_eq!(response.exit_code, 0);

    assert_eq!(runner.timeout_for(LIST_SOURCES), Some(Duration::from_millis(100)));
    assert_eq!(
        runner.timeout_for(&format!("pactl set-default-source {USB_MIC}")),
        Some(Duration::from_millis(200))
    );
    assert_eq!(
        runner.timeout_for(&format!("pactl move-source-output 9 {USB_MIC}")),
        Some(Duration::from_millis(300))
    );
}

#[tokio::test]
async fn test_missing_pactl_shows_placeholder() {
    let response = query_command(&container(ScriptedRunner::new()), "").await;

    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "No microphones found");
    assert!(items[0]["on_enter"].is_null());
}
