//! Herald core — the pieces every notification channel shares.
//!
//! - **message**: the `Message` payload producers enqueue
//! - **status**: the `StatusTracker` trait and its memory/file implementations
//! - **error**: `ChannelError` and `DeliveryError`
//! - **config**: JSON config schema, loader, env overrides

pub mod config;
pub mod error;
pub mod message;
pub mod status;
pub mod utils;

pub use error::{ChannelError, DeliveryError};
pub use message::Message;
pub use status::{FileStatusTracker, MemoryStatusTracker, StatusTracker};
