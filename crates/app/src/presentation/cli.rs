//! JSON command-line interface
//!
//! Every operation produces exactly one JSON object for stdout plus a process
//! exit code. Failures become `{"error": "..."}` with a non-zero code.

use micswitch_core::domain::audio::AudioError;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::container::Container;

#[derive(Debug, Clone, PartialEq)]
pub struct CliResponse {
    pub body: Value,
    pub exit_code: i32,
}

impl CliResponse {
    pub fn success(body: Value) -> Self {
        Self { body, exit_code: 0 }
    }

    pub fn error(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            body: json!({ "error": message.into() }),
            exit_code,
        }
    }

    /// Serialize `data`; a serialization failure is itself reported as JSON
    pub fn from_serializable<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(body) => Self::success(body),
            Err(e) => Self::error(format!("Failed to serialize JSON: {e}"), 1),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Pretty-printed JSON followed by a newline
    pub fn render(&self) -> String {
        let mut out = serde_json::to_string_pretty(&self.body)
            .unwrap_or_else(|_| r#"{"error": "Failed to serialize JSON"}"#.to_string());
        out.push('\n');
        out
    }
}

/// `list`: `{"sources": [{"name", "index"}, ...]}`
pub async fn list_command(container: &Container, query: &str, limit: i64) -> CliResponse {
    let limit = match usize::try_from(limit) {
        Ok(limit) if limit >= 1 => limit,
        _ => return CliResponse::error("limit must be at least 1", 1),
    };

    let result = match container.list_sources_use_case() {
        Ok(use_case) => use_case.execute(query, limit).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(sources) => CliResponse::from_serializable(&json!({ "sources": sources.sources() })),
        Err(e @ (AudioError::Validation(_) | AudioError::Platform(_))) => {
            CliResponse::error(e.to_string(), 1)
        }
        Err(e) => {
            error!(error = %e, "Error in list command");
            CliResponse::error(format!("Failed to list sources: {e}"), 1)
        }
    }
}

/// `switch`: `{"success": true, "message": "Switched to audio source: <name>"}`
pub async fn switch_command(container: &Container, name: &str) -> CliResponse {
    let name = name.trim();
    if name.is_empty() {
        return CliResponse::error("Source name cannot be empty", 1);
    }

    let result = match container.switch_source_use_case() {
        Ok(use_case) => use_case.execute(name).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            let mut body = json!({
                "success": true,
                "message": format!("Switched to audio source: {name}"),
            });
            if report.is_partial() {
                body["failed_streams"] = json!(report
                    .failed_streams
                    .iter()
                    .map(|(id, _)| id)
                    .collect::<Vec<_>>());
            }
            CliResponse::success(body)
        }
        Err(e) => {
            error!(error = %e, "Error in switch command");
            CliResponse::error(e.to_string(), 1)
        }
    }
}

/// `query`: launcher items for a search string, `{"items": [...]}`
pub async fn query_command(container: &Container, query: &str) -> CliResponse {
    match container.presenter() {
        Ok(presenter) => {
            let items = presenter.present_sources(query).await;
            CliResponse::from_serializable(&json!({ "items": items }))
        }
        Err(e) => CliResponse::error(e.to_string(), 1),
    }
}

/// `config`: the effective configuration
pub fn config_command(container: &Container) -> CliResponse {
    CliResponse::from_serializable(&container.config().to_file())
}
