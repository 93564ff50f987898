//! Herald Channels — asynchronous notification dispatch.
//!
//! This crate provides:
//! - **base**: The `Notifier` trait every concrete channel implements
//! - **channel**: `Channel` — a running channel's queue and delivery worker
//! - **registry**: `ChannelRegistry` — one channel per name, initialized once
//! - **console**: `ConsoleNotifier`, a channel that prints to stdout

pub mod base;
pub mod channel;
pub mod console;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use base::Notifier;
pub use channel::{Channel, ChannelStats};
pub use console::ConsoleNotifier;
pub use registry::ChannelRegistry;
