//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use slot_engine::MeetingType;

/// Paste-ready meeting availability.
///
/// Reads busy intervals from the configured calendars (or the local cache),
/// finds the open slots inside the daily work window, and prints them grouped
/// by day.
#[derive(Debug, Parser)]
#[command(name = "slots", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use cached events without asking
    #[arg(long, conflicts_with = "refresh")]
    pub cached: bool,

    /// Fetch fresh events without asking
    #[arg(long)]
    pub refresh: bool,

    /// Slot size: 1/lesson (60 min, 55 billed) or 2/meeting (30 min, 15 billed)
    #[arg(short, long)]
    pub meeting_type: Option<MeetingType>,

    /// Treat this local time as "now" (e.g. 2024-01-01T14:30:00)
    #[arg(long)]
    pub now: Option<NaiveDateTime>,

    /// Print the grouped slots as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write the output to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not copy the output to the system clipboard
    #[arg(long)]
    pub no_clipboard: bool,
}
