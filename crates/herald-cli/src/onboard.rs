//! `herald onboard` — initialize configuration.
//!
//! Creates `~/.herald/config.json` with defaults and the data directory the
//! status file lives in.

use anyhow::Result;
use colored::Colorize;

use herald_core::config::{get_config_path, load_config, save_config};
use herald_core::utils::get_data_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "📣 Herald — Setup".cyan().bold());
    println!();

    let data_dir = get_data_path();
    std::fs::create_dir_all(&data_dir)?;
    println!("  {} data dir at {}", "✓".green(), data_dir.display());

    let config_path = get_config_path();
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults + env
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!("  Next: {}", "herald send \"hello from herald\"".bold());
    println!();

    Ok(())
}
