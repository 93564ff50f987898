//! Channel handle and its delivery worker.
//!
//! A `Channel` only exists once its notifier has been initialized, so
//! nothing on the handle needs an initialization check. Each channel owns:
//! - an unbounded FIFO queue (`tokio::sync::mpsc`)
//! - exactly one delivery worker task draining that queue
//! - a backlog (`tokio::sync::watch`) backing `flush()`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use herald_core::utils::truncate_string;
use herald_core::{ChannelError, Message, StatusTracker};

use crate::base::Notifier;

/// Length of the message preview written to debug logs.
const LOG_PREVIEW_CHARS: usize = 60;

// ─────────────────────────────────────────────
// Stats
// ─────────────────────────────────────────────

/// Point-in-time counters for one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Messages accepted by `enqueue`.
    pub enqueued: u64,
    /// Messages whose `deliver` returned `Ok`.
    pub delivered: u64,
    /// Messages whose `deliver` returned `Err` and were dropped.
    pub failed: u64,
    /// Messages queued or being delivered right now. Stays above zero for
    /// whatever a stopped worker left behind.
    pub pending: u64,
}

#[derive(Default)]
struct Counters {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// What `flush` waits on.
#[derive(Clone, Copy, Debug)]
struct Backlog {
    pending: u64,
    worker_running: bool,
}

// ─────────────────────────────────────────────
// Channel
// ─────────────────────────────────────────────

struct Shared {
    name: String,
    queue: mpsc::UnboundedSender<Message>,
    backlog: watch::Sender<Backlog>,
    counters: Counters,
    tracker: Arc<dyn StatusTracker>,
}

/// Handle to a running notification channel.
///
/// Cheap to clone; every clone feeds the same queue and worker. Safe to use
/// from any number of concurrent producers.
#[derive(Clone)]
pub struct Channel {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.shared.name)
            .field("running", &self.is_running())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Channel {
    /// Create the queue and spawn the delivery worker.
    ///
    /// Must run inside a tokio runtime. The worker is detached: it runs until
    /// the runtime shuts down and never holds shutdown up.
    pub(crate) fn start(notifier: Arc<dyn Notifier>, tracker: Arc<dyn StatusTracker>) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        let (backlog, _) = watch::channel(Backlog {
            pending: 0,
            worker_running: true,
        });

        let shared = Arc::new(Shared {
            name: notifier.name().to_string(),
            queue,
            backlog,
            counters: Counters::default(),
            tracker,
        });

        let worker = Worker {
            notifier,
            rx,
            shared: shared.clone(),
        };
        tokio::spawn(worker.run());

        Channel { shared }
    }

    /// Channel name, as reported by its notifier.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Append `message` to the tail of the queue and return immediately.
    ///
    /// There is no delivery acknowledgment: failures during delivery are only
    /// visible in logs and in the status tracker not moving. Fails only if
    /// the worker is gone, either because its runtime shut down or because a
    /// notifier panicked.
    pub fn enqueue(&self, message: Message) -> Result<(), ChannelError> {
        self.shared.backlog.send_modify(|b| b.pending += 1);

        if self.shared.queue.send(message).is_err() {
            self.shared
                .backlog
                .send_modify(|b| b.pending = b.pending.saturating_sub(1));
            return Err(ChannelError::WorkerStopped(self.shared.name.clone()));
        }

        self.shared.counters.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Last successful delivery on this channel, read from the status tracker.
    pub async fn last_notify_time(&self) -> Result<Option<DateTime<Utc>>, ChannelError> {
        self.shared
            .tracker
            .get_status(&self.shared.name)
            .await
            .map_err(ChannelError::Status)
    }

    /// Wait until the queue is empty and no delivery is in flight.
    ///
    /// Everything enqueued before the call has been processed (delivered or
    /// dropped) once this returns `Ok`. Returns `WorkerStopped` as soon as the
    /// worker is gone with messages still pending; those are lost.
    pub async fn flush(&self) -> Result<(), ChannelError> {
        let mut rx = self.shared.backlog.subscribe();
        let settled = rx
            .wait_for(|b| b.pending == 0 || !b.worker_running)
            .await
            .map(|b| b.pending == 0)
            .unwrap_or(false);

        if settled {
            Ok(())
        } else {
            Err(ChannelError::WorkerStopped(self.shared.name.clone()))
        }
    }

    /// Whether the delivery worker is still alive.
    pub fn is_running(&self) -> bool {
        self.shared.backlog.borrow().worker_running
    }

    pub fn stats(&self) -> ChannelStats {
        let counters = &self.shared.counters;
        ChannelStats {
            enqueued: counters.enqueued.load(Ordering::Relaxed),
            delivered: counters.delivered.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            pending: self.shared.backlog.borrow().pending,
        }
    }

    /// Whether both handles refer to the same running channel.
    pub fn same_channel(&self, other: &Channel) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

// ─────────────────────────────────────────────
// Delivery worker
// ─────────────────────────────────────────────

/// State owned by the worker task. Dropping it (runtime shutdown, or a
/// panic unwinding out of `deliver`) closes the queue and wakes `flush`.
struct Worker {
    notifier: Arc<dyn Notifier>,
    rx: mpsc::UnboundedReceiver<Message>,
    shared: Arc<Shared>,
}

impl Worker {
    /// Drain the queue forever, one message at a time.
    async fn run(mut self) {
        info!(channel = %self.shared.name, "delivery worker started");

        // `Shared` keeps a sender alive, so `recv` never yields `None`.
        while let Some(message) = self.rx.recv().await {
            self.shared.process(self.notifier.as_ref(), message).await;
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.rx.close();
        self.shared.backlog.send_modify(|b| b.worker_running = false);

        let pending = self.shared.backlog.borrow().pending;
        if pending > 0 {
            warn!(channel = %self.shared.name, pending, "delivery worker stopped, pending messages lost");
        } else {
            debug!(channel = %self.shared.name, "delivery worker stopped");
        }
    }
}

impl Shared {
    /// Deliver one message. A failure is logged and the message dropped; the
    /// status tracker only moves on success.
    async fn process(&self, notifier: &dyn Notifier, message: Message) {
        match notifier.deliver(&message).await {
            Ok(()) => {
                self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                debug!(
                    channel = %self.name,
                    preview = %truncate_string(message.text(), LOG_PREVIEW_CHARS),
                    "message delivered"
                );

                if let Err(e) = self.tracker.update_status(&self.name).await {
                    warn!(channel = %self.name, error = %e, "failed to record delivery status");
                }
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    channel = %self.name,
                    error = %e,
                    preview = %truncate_string(message.text(), LOG_PREVIEW_CHARS),
                    "delivery failed, message dropped"
                );
            }
        }

        self.backlog
            .send_modify(|b| b.pending = b.pending.saturating_sub(1));
    }
}


// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
