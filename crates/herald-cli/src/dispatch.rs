//! `herald send` / `herald pipe` — push messages through a channel.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Open the file-backed status tracker
//! 3. Create the process-wide channel registry, register enabled channels
//! 4. Init the target channel (spawns its delivery worker)
//! 5. Enqueue, then flush before exiting so nothing queued is lost

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use herald_channels::{Channel, ChannelRegistry, ChannelStats, ConsoleNotifier};
use herald_core::config::{load_config, Config};
use herald_core::{ChannelError, FileStatusTracker, Message};

use crate::helpers;

/// Run `herald send`.
pub async fn send(
    channel: Option<String>,
    text: String,
    photos: Vec<String>,
    videos: Vec<String>,
) -> Result<()> {
    let config = load_config(None);
    let name = channel.unwrap_or_else(|| config.default_channel.clone());
    let registry = build_registry(&config).await?;
    let channel = init_channel(registry, &name).await?;

    let message = Message::new(text).with_photos(photos).with_videos(videos);
    channel.enqueue(message)?;
    let stats = drain(&channel, ChannelStats::default()).await?;

    if stats.failed > 0 {
        bail!("delivery through '{name}' failed (run with --logs for details)");
    }
    Ok(())
}

/// Run `herald pipe`.
pub async fn pipe(channel: Option<String>) -> Result<()> {
    let config = load_config(None);
    let name = channel.unwrap_or_else(|| config.default_channel.clone());
    let registry = build_registry(&config).await?;
    let channel = init_channel(registry, &name).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stats = forward(&channel, stdin).await?;

    eprintln!(
        "{} {} delivered, {} failed",
        "📣".cyan(),
        stats.delivered.to_string().green(),
        if stats.failed > 0 {
            stats.failed.to_string().red().to_string()
        } else {
            stats.failed.to_string()
        }
    );
    Ok(())
}

/// Create the process-wide registry backed by the configured status file,
/// with every enabled channel registered.
async fn build_registry(config: &Config) -> Result<&'static ChannelRegistry> {
    let status_path = helpers::expand_tilde(&config.status.path);
    debug!("status file: {}", status_path.display());

    let tracker = Arc::new(FileStatusTracker::open(Some(&status_path)).await);
    let registry = ChannelRegistry::init_global(tracker);
    register_enabled(registry, config)?;
    Ok(registry)
}

/// Register a notifier for every channel enabled in `config`.
pub fn register_enabled(registry: &ChannelRegistry, config: &Config) -> Result<()> {
    if config.channels.console.enabled {
        registry.register(Arc::new(ConsoleNotifier::from_config(
            &config.channels.console,
        )))?;
    }
    Ok(())
}

/// Init `name`, turning an unknown name into a hint about the config.
pub async fn init_channel(registry: &ChannelRegistry, name: &str) -> Result<Channel> {
    match registry.init(name).await {
        Err(ChannelError::UnknownChannel(_)) => bail!(
            "channel '{name}' is not enabled (enabled: {})",
            registry.channel_names().join(", ")
        ),
        other => other.with_context(|| format!("failed to initialize channel '{name}'")),
    }
}

/// Enqueue every line of `reader`, then drain the channel.
///
/// Lines enqueued before a read error are still drained before that error
/// is returned.
pub async fn forward<R>(channel: &Channel, reader: R) -> Result<ChannelStats>
where
    R: AsyncBufRead + Unpin,
{
    let before = channel.stats();
    let read = enqueue_lines(channel, reader).await;
    let stats = drain(channel, before).await?;

    let count = read.with_context(|| {
        format!(
            "input ended early ({} earlier message(s) delivered)",
            stats.delivered
        )
    })?;
    info!(channel = %channel.name(), count, "input closed, queue drained");
    Ok(stats)
}

/// Enqueue every non-blank line of `reader` as its own message.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub async fn enqueue_lines<R>(channel: &Channel, mut reader: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("failed to read input")?;
        if n == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if line.trim().is_empty() {
            continue;
        }
        channel.enqueue(Message::new(line))?;
        count += 1;
    }

    Ok(count)
}

/// Flush `channel` and return what happened since `before`.
pub async fn drain(channel: &Channel, before: ChannelStats) -> Result<ChannelStats> {
    channel.flush().await?;
    let after = channel.stats();
    Ok(ChannelStats {
        enqueued: after.enqueued - before.enqueued,
        delivered: after.delivered - before.delivered,
        failed: after.failed - before.failed,
        pending: after.pending,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
