//! File-backed status tracker.
//!
//! Disk format: a single pretty-printed JSON object at
//! `~/.herald/status.json`, mapping channel name to an RFC 3339 timestamp:
//! `{"telegram": "2026-01-01T12:00:00Z"}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{next_timestamp, StatusTracker};
use crate::utils;

/// Tracker that keeps its map in memory and writes it through to disk on
/// every update.
///
/// One mutex guards both the map and the file write, so concurrent updates
/// from different channels are serialized and never lose each other's keys.
pub struct FileStatusTracker {
    path: PathBuf,
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl FileStatusTracker {
    /// Open the tracker at `path`, defaulting to `~/.herald/status.json`.
    ///
    /// Existing entries are loaded. A missing file starts empty; an
    /// unreadable or corrupt one is logged and also starts empty.
    pub async fn open(path: Option<&Path>) -> Self {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(utils::get_status_path);
        let entries = load_entries(&path).await;

        FileStatusTracker {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of every entry, for status reporting.
    pub async fn snapshot(&self) -> HashMap<String, DateTime<Utc>> {
        self.entries.lock().await.clone()
    }

    async fn persist(&self, entries: &HashMap<String, DateTime<Utc>>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!("status saved to {}", self.path.display());
        Ok(())
    }
}

async fn load_entries(path: &Path) -> HashMap<String, DateTime<Utc>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no status file at {}, starting empty", path.display());
            return HashMap::new();
        }
        Err(e) => {
            warn!("Failed to read status file {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to parse status file {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}

#[async_trait]
impl StatusTracker for FileStatusTracker {
    async fn update_status(&self, channel: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        let ts = next_timestamp(entries.get(channel).copied());
        entries.insert(channel.to_string(), ts);
        self.persist(&entries).await
    }

    async fn get_status(&self, channel: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        Ok(self.entries.lock().await.get(channel).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FileStatusTracker::open(Some(&dir.path().join("status.json"))).await;

        assert!(tracker.get_status("telegram").await.unwrap().is_none());
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("status.json");

        let tracker = FileStatusTracker::open(Some(&path)).await;
        tracker.update_status("telegram").await.unwrap();
        let saved = tracker.get_status("telegram").await.unwrap().unwrap();

        assert!(path.exists());

        let reopened = FileStatusTracker::open(Some(&path)).await;
        assert_eq!(reopened.get_status("telegram").await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        std::fs::write(&path, "not json {{{").unwrap();

        let tracker = FileStatusTracker::open(Some(&path)).await;
        assert!(tracker.snapshot().await.is_empty());

        // The next update overwrites the corrupt file with valid JSON.
        tracker.update_status("sms").await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("sms").is_some());
    }

    #[tokio::test]
    async fn test_updates_keep_other_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");

        let tracker = FileStatusTracker::open(Some(&path)).await;
        tracker.update_status("email").await.unwrap();
        tracker.update_status("sms").await.unwrap();

        let reopened = FileStatusTracker::open(Some(&path)).await;
        let snapshot = reopened.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key("email"));
        assert!(snapshot.contains_key("sms"));
    }

    #[tokio::test]
    async fn test_unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        // Reading through a file fails with something other than NotFound.
        let tracker = FileStatusTracker::open(Some(&blocker.join("status.json"))).await;
        assert!(tracker.snapshot().await.is_empty());
        assert!(tracker.update_status("telegram").await.is_err());
    }

    #[tokio::test]
    async fn test_open_loads_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        tokio::fs::write(
            &path,
            r#"{"telegram": "2026-01-01T12:00:00Z", "email": "2026-02-03T04:05:06Z"}"#,
        )
        .await
        .unwrap();

        let tracker = FileStatusTracker::open(Some(&path)).await;
        assert_eq!(tracker.path(), path.as_path());

        let expected: DateTime<Utc> = "2026-01-01T12:00:00Z".parse().unwrap();
        assert_eq!(tracker.get_status("telegram").await.unwrap(), Some(expected));
        assert_eq!(tracker.snapshot().await.len(), 2);
    }
}
