//! `slots` CLI — print open meeting slots ready to paste into a message.
//!
//! ## Usage
//!
//! ```sh
//! # Ask whether to reuse cached events and which meeting type to size for
//! slots
//!
//! # Non-interactive: cached events, 30-minute meeting slots
//! slots --cached --meeting-type meeting
//!
//! # Fresh events, JSON output, also written to a file
//! SLOTS_ACCESS_TOKEN=... slots --refresh -m 1 --json -o availability.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use slot_cli::{availability, Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so stdout carries only the availability text
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    availability::run(&cli, &config)
}
