//! Channel Registry — one logical channel per name, initialized once.
//!
//! Responsibilities:
//! - Register notifiers (uninitialized channels), rejecting duplicate names
//! - Initialize a channel exactly once: run its setup, spawn its worker
//! - Guard name-keyed operations with `NotInitialized`
//! - Hand out `Channel` handles to producers

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use herald_core::{ChannelError, Message, StatusTracker};

use crate::base::Notifier;
use crate::channel::Channel;

static GLOBAL: OnceLock<ChannelRegistry> = OnceLock::new();

/// A registered channel: its notifier, and the running handle once `init`
/// has succeeded.
#[derive(Clone)]
struct Slot {
    notifier: Arc<dyn Notifier>,
    running: Arc<OnceCell<Channel>>,
}

// ─────────────────────────────────────────────
// ChannelRegistry
// ─────────────────────────────────────────────

/// Owns every notification channel of a process, keyed by name.
///
/// Channels are registered with `register()` and brought up with `init()`.
/// All channels share the registry's status tracker.
pub struct ChannelRegistry {
    slots: Mutex<HashMap<String, Slot>>,
    tracker: Arc<dyn StatusTracker>,
}

impl ChannelRegistry {
    /// Create a registry whose channels report to `tracker`.
    pub fn new(tracker: Arc<dyn StatusTracker>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            tracker,
        }
    }

    /// The process-wide registry, created on first call with `tracker`.
    ///
    /// Later calls return the same registry and ignore their argument.
    pub fn init_global(tracker: Arc<dyn StatusTracker>) -> &'static ChannelRegistry {
        GLOBAL.get_or_init(|| ChannelRegistry::new(tracker))
    }

    /// The process-wide registry, if `init_global` has run.
    pub fn global() -> Option<&'static ChannelRegistry> {
        GLOBAL.get()
    }

    /// The status tracker shared by every channel.
    pub fn tracker(&self) -> &Arc<dyn StatusTracker> {
        &self.tracker
    }

    /// Register an uninitialized channel.
    pub fn register(&self, notifier: Arc<dyn Notifier>) -> Result<(), ChannelError> {
        let name = notifier.name().to_string();
        let mut slots = self.lock_slots();

        if slots.contains_key(&name) {
            return Err(ChannelError::AlreadyRegistered(name));
        }

        info!(channel = %name, "registered channel");
        slots.insert(
            name,
            Slot {
                notifier,
                running: Arc::new(OnceCell::new()),
            },
        );
        Ok(())
    }

    /// Initialize a registered channel and return its handle.
    ///
    /// Runs the notifier's `setup()`, creates the queue, and starts the
    /// delivery worker. Concurrent or repeated calls are safe: only the
    /// first successful one does any work, the rest get the same handle.
    /// A failed setup leaves the channel uninitialized.
    pub async fn init(&self, name: &str) -> Result<Channel, ChannelError> {
        let slot = self.slot(name)?;

        if let Some(channel) = slot.running.get() {
            debug!(channel = %name, "channel already initialized");
            return Ok(channel.clone());
        }

        let tracker = self.tracker.clone();
        let channel = slot
            .running
            .get_or_try_init(|| async {
                slot.notifier
                    .setup()
                    .await
                    .map_err(|source| ChannelError::Setup {
                        channel: name.to_string(),
                        source,
                    })?;
                info!(channel = %name, "channel initialized");
                Ok::<_, ChannelError>(Channel::start(slot.notifier.clone(), tracker))
            })
            .await?;

        Ok(channel.clone())
    }

    /// Initialize every registered channel.
    ///
    /// A channel whose setup fails is logged and skipped; the others still
    /// come up. Returns the handles that are running.
    pub async fn init_all(&self) -> Vec<Channel> {
        let names = self.channel_names();
        if names.is_empty() {
            warn!("no channels registered, nothing to initialize");
            return Vec::new();
        }

        info!(channels = ?names, "initializing {} channel(s)", names.len());

        let mut running = Vec::with_capacity(names.len());
        for name in names {
            match self.init(&name).await {
                Ok(channel) => running.push(channel),
                Err(e) => error!(channel = %name, error = %e, "channel init failed"),
            }
        }
        running
    }

    /// Handle of an initialized channel.
    pub fn channel(&self, name: &str) -> Result<Channel, ChannelError> {
        let slot = self.slot(name)?;
        slot.running
            .get()
            .cloned()
            .ok_or_else(|| ChannelError::NotInitialized {
                channel: name.to_string(),
            })
    }

    /// Enqueue a message on an initialized channel.
    pub fn enqueue(&self, name: &str, message: Message) -> Result<(), ChannelError> {
        self.channel(name)?.enqueue(message)
    }

    /// Last successful delivery on an initialized channel.
    pub async fn last_notify_time(
        &self,
        name: &str,
    ) -> Result<Option<DateTime<Utc>>, ChannelError> {
        self.channel(name)?.last_notify_time().await
    }

    /// Wait until an initialized channel has processed its queue.
    pub async fn flush(&self, name: &str) -> Result<(), ChannelError> {
        self.channel(name)?.flush().await
    }

    /// Whether `name` is registered and initialized.
    ///
    /// Never goes back to `false`, even if the worker later dies; use
    /// [`Channel::is_running`] for that.
    pub fn is_initialized(&self, name: &str) -> bool {
        self.slot(name)
            .map(|slot| slot.running.initialized())
            .unwrap_or(false)
    }

    /// Get the names of all registered channels, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock_slots().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    /// Whether there are no registered channels.
    pub fn is_empty(&self) -> bool {
        self.lock_slots().is_empty()
    }

    fn slot(&self, name: &str) -> Result<Slot, ChannelError> {
        self.lock_slots()
            .get(name)
            .cloned()
            .ok_or_else(|| ChannelError::UnknownChannel(name.to_string()))
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        // Slots are only inserted whole, so a poisoned map is still consistent.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
