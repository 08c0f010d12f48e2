//! Listing microphones with optional search and a display cap

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::audio::{AudioSourceList, AudioSystemClient, Result};

/// Filtered view of the current devices plus the unfiltered count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub matches: AudioSourceList,
    /// Number of devices before filtering and truncation
    pub total: usize,
}

pub struct ListSourcesUseCase {
    client: Arc<dyn AudioSystemClient>,
}

impl ListSourcesUseCase {
    pub fn new(client: Arc<dyn AudioSystemClient>) -> Self {
        Self { client }
    }

    /// Sources whose name or display name contains `query` (case-insensitive),
    /// at most `limit` of them, in enumeration order
    pub async fn execute(&self, query: &str, limit: usize) -> Result<AudioSourceList> {
        Ok(self.execute_detailed(query, limit).await?.matches)
    }

    /// Same as [`execute`](Self::execute), also reporting how many devices
    /// exist in total
    #[instrument(skip(self), fields(backend = self.client.backend()))]
    pub async fn execute_detailed(&self, query: &str, limit: usize) -> Result<SourceListing> {
        let all = self.client.list().await?;
        let total = all.len();
        let matches = filter_sources(all, query, limit);

        debug!(total, matched = matches.len(), "Listed sources");
        Ok(SourceListing { matches, total })
    }
}

/// Apply the substring filter then the cap; never fails
pub fn filter_sources(sources: AudioSourceList, query: &str, limit: usize) -> AudioSourceList {
    let needle = query.trim().to_lowercase();

    let selected = sources
        .into_vec()
        .into_iter()
        .filter(|source| needle.is_empty() || source.matches(&needle))
        .take(limit)
        .collect();

    AudioSourceList::new(selected)
}
