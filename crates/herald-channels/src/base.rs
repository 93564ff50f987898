//! Notifier trait — the contract every concrete channel implements.
//!
//! The framework owns queueing, ordering, and failure isolation. A notifier
//! only knows how to transmit one message:
//! - `name()` — channel identifier, the key used by the registry and the
//!   status tracker
//! - `setup()` — optional channel-specific setup, run once by `init`
//! - `deliver()` — transmit one message, surfacing every failure as an error

use async_trait::async_trait;
use herald_core::{DeliveryError, Message};

/// Every notification channel implements this trait.
///
/// The `ChannelRegistry` holds `Arc<dyn Notifier>` and runs `deliver` from
/// the channel's single delivery worker, one message at a time.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Unique channel name (e.g. "telegram", "sms", "console").
    fn name(&self) -> &str;

    /// Channel-specific setup, run once before the delivery worker starts.
    ///
    /// A failure leaves the channel uninitialized.
    async fn setup(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Transmit one message.
    ///
    /// Must never fail silently: the worker only logs what comes back as `Err`.
    async fn deliver(&self, message: &Message) -> Result<(), DeliveryError>;
}
