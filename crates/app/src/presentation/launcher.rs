//! Launcher presenter
//!
//! Turns a search query into launcher result items. Each item carries a
//! shell script the launcher runs when the item is chosen; the script sets the
//! default source, moves live capture streams and raises a notification.

use micswitch_core::application::{ListSourcesUseCase, SourceListing};
use micswitch_core::domain::audio::truncate_chars;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Longest query forwarded to the use case, in characters
pub const MAX_QUERY_CHARS: usize = 100;

/// Longest notification body, in characters
pub const MAX_NOTIFICATION_BODY_CHARS: usize = 50;

pub const ITEM_ICON: &str = "images/icon.png";
pub const NOTIFICATION_ICON: &str = "audio-input-microphone";
pub const NOTIFICATION_TITLE: &str = "Microphone Changed";

/// One row in the launcher: label, description and optional action command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub icon: String,
    pub name: String,
    pub description: String,
    /// Shell script run on selection; `None` for informational rows
    pub on_enter: Option<String>,
}

impl ResultItem {
    fn info(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            icon: ITEM_ICON.to_string(),
            name: name.into(),
            description: description.into(),
            on_enter: None,
        }
    }
}

pub struct LauncherPresenter {
    list_use_case: Arc<ListSourcesUseCase>,
    max_sources: usize,
    notification_expire_time: u32,
}

impl LauncherPresenter {
    pub fn new(
        list_use_case: Arc<ListSourcesUseCase>,
        max_sources: usize,
        notification_expire_time: u32,
    ) -> Self {
        Self {
            list_use_case,
            max_sources,
            notification_expire_time,
        }
    }

    /// Result items for `query`. Never empty, never fails: problems are shown
    /// as a single informational row.
    pub async fn present_sources(&self, query: &str) -> Vec<ResultItem> {
        let query = truncate_chars(query, MAX_QUERY_CHARS);

        match self
            .list_use_case
            .execute_detailed(&query, self.max_sources)
            .await
        {
            Ok(listing) => self.render(listing),
            Err(e) => {
                error!(error = %e, "Failed to list sources");
                vec![ResultItem::info("Error", e.to_string())]
            }
        }
    }

    fn render(&self, listing: SourceListing) -> Vec<ResultItem> {
        if listing.total == 0 {
            return vec![ResultItem::info(
                "No microphones found",
                "Make sure PulseAudio/PipeWire is running",
            )];
        }

        if listing.matches.is_empty() {
            return vec![ResultItem::info(
                "No matching sources",
                format!("Found {} source(s) total", listing.total),
            )];
        }

        debug!(shown = listing.matches.len(), total = listing.total, "Rendering sources");
        listing
            .matches
            .iter()
            .map(|source| {
                let display_name = source.display_name();
                ResultItem {
                    icon: ITEM_ICON.to_string(),
                    on_enter: Some(self.switch_command(&source.name, &display_name)),
                    name: display_name,
                    description: "Set as default microphone".to_string(),
                }
            })
            .collect()
    }

    /// Shell script that switches to `source_name`, migrates capture streams
    /// (ignoring individual failures) and notifies the user
    pub fn switch_command(&self, source_name: &str, display_name: &str) -> String {
        let name = shell_escape(source_name);
        let body_source = if display_name.is_empty() {
            source_name
        } else {
            display_name
        };
        let body = shell_escape(&truncate_chars(body_source, MAX_NOTIFICATION_BODY_CHARS));

        format!(
            "pactl set-default-source {name} 2>&1 && \\\n\
             for stream_id in $(pactl list short source-outputs 2>/dev/null | cut -f1); do\n    \
                 if [ -n \"$stream_id\" ]; then\n        \
                     pactl move-source-output \"$stream_id\" {name} 2>&1 || true\n    \
                 fi\n\
             done && notify-send {title} {body} --icon={icon} --expire-time={expire}",
            title = shell_escape(NOTIFICATION_TITLE),
            icon = NOTIFICATION_ICON,
            expire = self.notification_expire_time,
        )
    }
}

/// POSIX shell quoting: the result is always read back as one literal word
pub fn shell_escape(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@'))
    {
        return arg.to_string();
    }

    // Inside single quotes only the quote itself needs handling: close the
    // quote, emit an escaped quote, reopen
    let mut escaped = String::with_capacity(arg.len() + 2);
    escaped.push('\'');
    for c in arg.chars() {
        if c == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(c);
        }
    }
    escaped.push('\'');
    escaped
}
