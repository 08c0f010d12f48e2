//! Switching the default microphone

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::audio::{AudioError, AudioSystemClient, Result, SwitchReport};

pub struct SwitchSourceUseCase {
    client: Arc<dyn AudioSystemClient>,
}

impl SwitchSourceUseCase {
    pub fn new(client: Arc<dyn AudioSystemClient>) -> Self {
        Self { client }
    }

    /// Make `name` the default input. Blank names are rejected without
    /// touching the audio system.
    #[instrument(skip(self), fields(backend = self.client.backend()))]
    pub async fn execute(&self, name: &str) -> Result<SwitchReport> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AudioError::Validation("name cannot be empty".to_string()));
        }

        let report = self.client.switch_to(name).await?;

        if report.is_partial() {
            warn!(
                moved = report.moved_streams.len(),
                failed = report.failed_streams.len(),
                "Some capture streams stayed on the previous source"
            );
        }
        info!(source = name, "Default source switched");
        Ok(report)
    }
}
