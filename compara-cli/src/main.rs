//! Compara CLI: compare catalog products from the terminal.
//!
//! Renders comparison tables and manages saved comparisons.

mod commands;
mod render;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Compara: side-by-side product comparisons
#[derive(Parser, Debug)]
#[command(name = "compara", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (holds `.compara/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compare products side by side
    Compare {
        /// Product ids, in column order
        #[arg(required = true)]
        ids: Vec<String>,
        /// Hide a specification row (repeatable)
        #[arg(long = "hide", value_name = "KEY")]
        hidden: Vec<String>,
        /// Do not highlight the best-rated product
        #[arg(long)]
        no_highlight: bool,
        /// Save the comparison under this name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the specification keys the given products define
    Keys {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Manage saved comparisons
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum SavedAction {
    /// List saved comparisons
    List,
    /// Show the record of one saved comparison
    Show {
        /// Saved comparison id
        id: String,
    },
    /// Reopen a saved comparison as a table
    Open {
        /// Saved comparison id
        id: String,
    },
    /// Delete all saved comparisons
    Clear,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default `.compara/config.toml` in the workspace
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = compara_core::config::log_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "compara.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace, cli.quiet).await
}
