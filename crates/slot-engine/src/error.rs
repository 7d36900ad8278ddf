//! Error types for slot-engine operations.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid work policy: {0}")]
    InvalidPolicy(String),

    /// Busy intervals must be sorted ascending by start. `index` is the first
    /// interval that starts before its predecessor.
    #[error("Busy intervals are not sorted by start (first out-of-order index: {index})")]
    UnsortedInput { index: usize },

    /// A busy interval whose start is not strictly before its end.
    #[error("Busy interval {index} does not end after it starts")]
    InvalidInterval { index: usize },

    /// A single interval built directly whose start is not before its end.
    #[error("Busy interval {start} to {end} does not end after it starts")]
    EmptyInterval { start: NaiveDateTime, end: NaiveDateTime },

    #[error("No open slots to report")]
    EmptyReport,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
