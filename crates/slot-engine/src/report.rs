//! Per-day grouping and text rendering of open slots.
//!
//! The rendered form is meant to be pasted into a message as-is:
//!
//! ```text
//! Current availability for a 55-minute session (UK local time):
//! Monday 1st January: 15:00-15:55, 16:00-16:55
//! Tuesday 2nd January: 17:00-17:55
//! ```

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::slots::OpenSlot;

/// Zone label used by [`render_report`].
pub const DEFAULT_ZONE_LABEL: &str = "UK local time";

/// The open slots of one calendar date, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<OpenSlot>,
}

/// Open slots grouped by date. Dates appear in the order of the input slots
/// and only dates with at least one slot are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub days: Vec<DaySlots>,
}

impl AvailabilityReport {
    /// Group an ordered slot sequence by date.
    ///
    /// Consecutive slots sharing a date go into the same group; no reordering
    /// takes place.
    pub fn group(slots: &[OpenSlot]) -> Self {
        let mut days: Vec<DaySlots> = Vec::new();
        for slot in slots {
            let date = slot.start.date();
            match days.last_mut() {
                Some(day) if day.date == date => day.slots.push(*slot),
                _ => days.push(DaySlots {
                    date,
                    slots: vec![*slot],
                }),
            }
        }
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of slots across all dates.
    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|d| d.slots.len()).sum()
    }

    /// Render the header followed by one line per date.
    ///
    /// Each slot shows its start and `start + billable` in 24-hour time.
    ///
    /// # Errors
    /// Returns `SlotError::EmptyReport` when there are no dates to list.
    pub fn render(&self, billable: Duration, zone_label: &str) -> Result<String> {
        if self.is_empty() {
            return Err(SlotError::EmptyReport);
        }

        let mut out = render_header(billable, zone_label);
        for day in &self.days {
            let ranges: Vec<String> = day
                .slots
                .iter()
                .map(|slot| {
                    format!(
                        "{}-{}",
                        slot.start.format("%H:%M"),
                        slot.end(billable).format("%H:%M")
                    )
                })
                .collect();
            out.push('\n');
            out.push_str(&format_day_heading(day.date));
            out.push_str(": ");
            out.push_str(&ranges.join(", "));
        }
        Ok(out)
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Group `slots` by date and render them with [`DEFAULT_ZONE_LABEL`].
///
/// # Errors
/// Returns `SlotError::EmptyReport` when `slots` is empty.
pub fn render_report(slots: &[OpenSlot], billable: Duration) -> Result<String> {
    AvailabilityReport::group(slots).render(billable, DEFAULT_ZONE_LABEL)
}

/// The first line of every report, also used on its own when nothing is free.
pub fn render_header(billable: Duration, zone_label: &str) -> String {
    format!(
        "Current availability for a {}-minute session ({}):",
        billable.num_minutes(),
        zone_label
    )
}

/// `"Monday 1st January"`.
pub fn format_day_heading(date: NaiveDate) -> String {
    format!(
        "{} {}{} {}",
        date.format("%A"),
        date.day(),
        ordinal_suffix(date.day()),
        date.format("%B")
    )
}

/// Ordinal suffix for a day of the month.
///
/// Days 4–20 and 24–30 take "th"; every other day is keyed on its last digit
/// (1 → "st", 2 → "nd", 3 → "rd").
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        4..=20 | 24..=30 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
