//! Status tracking — last successful delivery time per channel.
//!
//! The delivery workers of every channel share one tracker and write only
//! under their own channel name.
//!
//! - **memory**: `MemoryStatusTracker`, process-local map
//! - **file**: `FileStatusTracker`, the same map persisted as JSON

pub mod file;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use file::FileStatusTracker;
pub use memory::MemoryStatusTracker;

/// Keyed store of last-successful-delivery timestamps.
#[async_trait]
pub trait StatusTracker: Send + Sync {
    /// Record "now" as the last successful delivery for `channel`.
    async fn update_status(&self, channel: &str) -> anyhow::Result<()>;

    /// Last successful delivery for `channel`, if there ever was one.
    async fn get_status(&self, channel: &str) -> anyhow::Result<Option<DateTime<Utc>>>;
}

/// Timestamp to store for a key: now, but never earlier than what is there.
pub(crate) fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}
