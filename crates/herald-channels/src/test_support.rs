//! Shared mocks for the channel and registry tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_core::{DeliveryError, Message, StatusTracker};
use tokio::sync::{Mutex, Semaphore};

use crate::base::Notifier;

/// Records every text it is asked to deliver, in call order.
///
/// Fails for texts listed in `fail_on` and panics on `panic_on`. When gated, each delivery waits for
/// a permit, so tests control exactly when the worker makes progress.
pub(crate) struct RecordingNotifier {
    name: String,
    pub attempts: Arc<Mutex<Vec<String>>>,
    pub setup_calls: Arc<AtomicUsize>,
    fail_on: HashSet<String>,
    panic_on: Option<String>,
    failing_setups: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingNotifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attempts: Arc::new(Mutex::new(Vec::new())),
            setup_calls: Arc::new(AtomicUsize::new(0)),
            fail_on: HashSet::new(),
            panic_on: None,
            failing_setups: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn failing_on(mut self, texts: &[&str]) -> Self {
        self.fail_on = texts.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn panicking_on(mut self, text: &str) -> Self {
        self.panic_on = Some(text.to_string());
        self
    }

    /// Make the first `n` calls to `setup` fail.
    pub fn failing_setups(self, n: usize) -> Self {
        self.failing_setups.store(n, Ordering::SeqCst);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn setup(&self) -> anyhow::Result<()> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_setups.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_setups.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("credentials rejected");
        }
        Ok(())
    }

    async fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.attempts.lock().await.push(message.text().to_string());
        if self.panic_on.as_deref() == Some(message.text()) {
            panic!("notifier '{}' blew up on '{}'", self.name, message.text());
        }
        if self.fail_on.contains(message.text()) {
            return Err(DeliveryError::Transport(format!(
                "upstream refused '{}'",
                message.text()
            )));
        }
        Ok(())
    }
}

/// Status tracker whose storage is permanently unavailable.
pub(crate) struct FailingTracker;

#[async_trait]
impl StatusTracker for FailingTracker {
    async fn update_status(&self, channel: &str) -> anyhow::Result<()> {
        anyhow::bail!("status store unavailable, cannot record '{channel}'")
    }

    async fn get_status(&self, channel: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        anyhow::bail!("status store unavailable, cannot read '{channel}'")
    }
}
