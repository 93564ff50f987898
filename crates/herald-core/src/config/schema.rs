//! Configuration schema.
//!
//! Hierarchy: `Config` → `ChannelsConfig`, `StatusConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.herald/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Channel used by the CLI when none is given on the command line.
    pub default_channel: String,
    pub channels: ChannelsConfig,
    pub status: StatusConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_channel: "console".to_string(),
            channels: ChannelsConfig::default(),
            status: StatusConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────

/// All channel configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl ChannelsConfig {
    /// Names of the enabled channels, sorted.
    pub fn enabled_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.console.enabled {
            names.push("console".to_string());
        }
        names.sort();
        names
    }
}

/// Console channel config — prints notifications to stdout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Text prepended to every printed notification line.
    #[serde(default)]
    pub prefix: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────

/// Where last-delivery timestamps are persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusConfig {
    /// Path of the status JSON file. `~` is expanded.
    pub path: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            path: "~/.herald/status.json".to_string(),
        }
    }
}
