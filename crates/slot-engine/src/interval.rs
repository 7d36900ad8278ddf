//! Busy intervals and the half-open overlap rule.
//!
//! A busy interval is an existing calendar event that blocks availability. The
//! engine expects a sequence of them sorted ascending by start; [`ensure_sorted`]
//! checks that precondition before any slot is filtered.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// An existing event that blocks availability during `[start, end)`.
///
/// Serializes as `{subject, startDateTime, endDateTime}` with ISO-8601 local
/// timestamps, which is the on-disk cache format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    /// Event title. Informational only.
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "startDateTime")]
    pub start: NaiveDateTime,
    #[serde(rename = "endDateTime")]
    pub end: NaiveDateTime,
}

impl BusyInterval {
    /// Build an interval, rejecting one that does not end after it starts.
    pub fn new(subject: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(SlotError::EmptyInterval { start, end });
        }
        Ok(Self {
            subject: subject.into(),
            start,
            end,
        })
    }

    /// Whether this interval overlaps `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        is_overlap(start, end, self.start, self.end)
    }
}

/// Two intervals overlap iff `max(start_a, start_b) < min(end_a, end_b)`.
///
/// Touching endpoints (one ends exactly when the other starts) do not overlap.
pub fn is_overlap(
    start_a: NaiveDateTime,
    end_a: NaiveDateTime,
    start_b: NaiveDateTime,
    end_b: NaiveDateTime,
) -> bool {
    start_a.max(start_b) < end_a.min(end_b)
}

/// Check that every interval is well-formed and that starts never decrease.
///
/// Equal starts are allowed. Empty and single-element sequences always pass.
pub fn ensure_sorted(busy: &[BusyInterval]) -> Result<()> {
    for (index, interval) in busy.iter().enumerate() {
        if interval.start >= interval.end {
            return Err(SlotError::InvalidInterval { index });
        }
        if index > 0 && interval.start < busy[index - 1].start {
            return Err(SlotError::UnsortedInput { index });
        }
    }
    Ok(())
}

/// Sort intervals ascending by `(start, end)`. The sort is stable, so events
/// with identical times keep their relative order.
pub fn sort_intervals(busy: &mut [BusyInterval]) {
    busy.sort_by_key(|interval| (interval.start, interval.end));
}
