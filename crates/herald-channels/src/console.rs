//! Console channel — prints notifications as plain lines.
//!
//! Output per message:
//! ```text
//! <prefix><text>
//! <prefix>  photo: <url>
//! <prefix>  video: <url>
//! ```

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use herald_core::config::schema::ConsoleConfig;
use herald_core::{DeliveryError, Message};

use crate::base::Notifier;

pub const CONSOLE_CHANNEL: &str = "console";

/// Writes each message to stdout (or any other sink).
pub struct ConsoleNotifier {
    prefix: String,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    /// Console notifier writing to stdout.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_writer(prefix, Box::new(std::io::stdout()))
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.prefix.clone())
    }

    /// Console notifier writing to `out`.
    pub fn with_writer(prefix: impl Into<String>, out: Box<dyn Write + Send>) -> Self {
        Self {
            prefix: prefix.into(),
            out: Mutex::new(out),
        }
    }

    fn write_message(&self, out: &mut dyn Write, message: &Message) -> std::io::Result<()> {
        let prefix = &self.prefix;
        writeln!(out, "{prefix}{}", message.text())?;
        for url in message.photo_urls().unwrap_or_default() {
            writeln!(out, "{prefix}  photo: {url}")?;
        }
        for url in message.video_urls().unwrap_or_default() {
            writeln!(out, "{prefix}  video: {url}")?;
        }
        out.flush()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        CONSOLE_CHANNEL
    }

    async fn setup(&self) -> anyhow::Result<()> {
        debug!(prefix = %self.prefix, "console channel ready");
        Ok(())
    }

    async fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_message(&mut **out, message)
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}
