//! Availability CLI library.
//!
//! Wires the slot engine to its collaborators: configuration, the events
//! cache, the calendar API and the interactive prompts.

pub mod availability;
pub mod cache;
mod cli;
pub mod config;
pub mod graph;
pub mod prompt;
pub mod provider;

pub use cli::Cli;
pub use config::Config;
