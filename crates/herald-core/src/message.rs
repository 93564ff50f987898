//! Message payload — what producers hand to a channel.
//!
//! A `Message` is moved into the channel's queue on enqueue and consumed
//! exactly once by that channel's delivery worker.

use serde::{Deserialize, Serialize};

/// A notification payload: text plus optional media references.
///
/// Fields are read-only once built. `None` for a media list means
/// "no media of that kind"; there is no distinction from an empty list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_urls: Option<Vec<String>>,
}

impl Message {
    /// Create a text-only message.
    pub fn new(text: impl Into<String>) -> Self {
        Message {
            text: text.into(),
            photo_urls: None,
            video_urls: None,
        }
    }

    /// Attach photo URLs, in order. An empty iterator leaves photos absent.
    pub fn with_photos<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photo_urls = collect_urls(urls);
        self
    }

    /// Attach video URLs, in order. An empty iterator leaves videos absent.
    pub fn with_videos<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.video_urls = collect_urls(urls);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn photo_urls(&self) -> Option<&[String]> {
        self.photo_urls.as_deref()
    }

    pub fn video_urls(&self) -> Option<&[String]> {
        self.video_urls.as_deref()
    }

    /// Whether any photo or video is attached.
    pub fn has_media(&self) -> bool {
        self.photo_urls.is_some() || self.video_urls.is_some()
    }
}

fn collect_urls<I, S>(urls: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}
