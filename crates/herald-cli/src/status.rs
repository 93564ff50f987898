//! `herald status` — show configuration and delivery status.
//!
//! - Shows config path and status file path
//! - Shows the last successful delivery of every enabled channel
//! - Lists channels found in the status file that are no longer enabled

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;

use herald_core::config::{get_config_path, load_config};
use herald_core::FileStatusTracker;

use crate::helpers;

/// One line of the channel table.
struct StatusRow {
    name: String,
    enabled: bool,
    last: Option<DateTime<Utc>>,
}

/// Run the status command.
pub async fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();
    let status_path = helpers::expand_tilde(&config.status.path);

    println!();
    println!("{}", "📣 Herald Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}",
        "Status file:".bold(),
        status_path.display()
    );
    println!(
        "  {:<18} {}",
        "Default channel:".bold(),
        config.default_channel
    );

    let tracker = FileStatusTracker::open(Some(&status_path)).await;
    let snapshot = tracker.snapshot().await;
    let rows = build_rows(&config.channels.enabled_names(), &snapshot);

    println!();
    println!("  {}", "Channels:".bold());
    if rows.is_empty() {
        println!("    {}", "· none enabled".dimmed());
    }

    let now = Utc::now();
    for row in rows {
        let last = match row.last {
            Some(ts) => format!(
                "{} {}",
                ts.format("%Y-%m-%d %H:%M:%S UTC"),
                format!("({})", helpers::format_age(ts, now)).dimmed()
            ),
            None => format!("{}", "· never delivered".dimmed()),
        };
        let state = if row.enabled {
            "✓".green().to_string()
        } else {
            "(disabled)".yellow().to_string()
        };
        println!("    {:<14} {} {}", row.name, state, last);
    }

    println!();

    Ok(())
}

/// Enabled channels first (in order), then any channel that only appears in
/// the status file, sorted.
fn build_rows(
    enabled: &[String],
    snapshot: &std::collections::HashMap<String, DateTime<Utc>>,
) -> Vec<StatusRow> {
    let mut rows: Vec<StatusRow> = enabled
        .iter()
        .map(|name| StatusRow {
            name: name.clone(),
            enabled: true,
            last: snapshot.get(name).copied(),
        })
        .collect();

    let mut stale: Vec<&String> = snapshot
        .keys()
        .filter(|name| !enabled.contains(name))
        .collect();
    stale.sort();

    rows.extend(stale.into_iter().map(|name| StatusRow {
        name: name.clone(),
        enabled: false,
        last: snapshot.get(name).copied(),
    }));
    rows
}
