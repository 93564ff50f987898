//! In-memory status tracker.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{next_timestamp, StatusTracker};

/// Process-local tracker. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStatusTracker {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry, for status reporting.
    pub async fn snapshot(&self) -> HashMap<String, DateTime<Utc>> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl StatusTracker for MemoryStatusTracker {
    async fn update_status(&self, channel: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        let ts = next_timestamp(entries.get(channel).copied());
        entries.insert(channel.to_string(), ts);
        Ok(())
    }

    async fn get_status(&self, channel: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        Ok(self.entries.read().await.get(channel).copied())
    }
}
