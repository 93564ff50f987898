//! Herald CLI — entry point.
//!
//! # Commands
//!
//! - `herald onboard` — write the default config
//! - `herald send [-c CHANNEL] TEXT [--photo URL]... [--video URL]...` — deliver one message
//! - `herald pipe [-c CHANNEL]` — deliver every stdin line as a message
//! - `herald status` — show configuration and last delivery per channel
//!
//! Every command accepts `--logs` for debug output on stderr.

mod dispatch;
mod helpers;
mod onboard;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 📣 Herald — fire-and-forget notification dispatch
#[derive(Parser)]
#[command(name = "herald", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and last successful delivery per channel
    Status {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Deliver a single message through a channel
    Send {
        /// Message text
        text: String,

        /// Channel name (defaults to `defaultChannel` from config)
        #[arg(short, long)]
        channel: Option<String>,

        /// Photo URL to attach (repeatable)
        #[arg(long = "photo")]
        photos: Vec<String>,

        /// Video URL to attach (repeatable)
        #[arg(long = "video")]
        videos: Vec<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Deliver every line read from stdin as its own message
    Pipe {
        /// Channel name (defaults to `defaultChannel` from config)
        #[arg(short, long)]
        channel: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Onboard { logs } => {
            init_logging(logs);
            onboard::run()
        }
        Commands::Status { logs } => {
            init_logging(logs);
            status::run().await
        }
        Commands::Send {
            text,
            channel,
            photos,
            videos,
            logs,
        } => {
            init_logging(logs);
            dispatch::send(channel, text, photos, videos).await
        }
        Commands::Pipe { channel, logs } => {
            init_logging(logs);
            dispatch::pipe(channel).await
        }
    }
}

/// Initialize tracing/logging.
///
/// Logs go to stderr; stdout belongs to the console channel.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("herald=debug,herald_channels=debug,herald_core=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
