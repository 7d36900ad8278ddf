//! Candidate grid generation and overlap filtering.
//!
//! The grid walks each workday in fixed steps of the slot duration. On the day
//! of `now` the walk starts at the next full hour instead of the work start, so
//! nothing in the past (or mid-hour right now) is offered. Candidates are then
//! merged against the start-sorted busy list with a single forward cursor,
//! which keeps the filter linear in `candidates + busy`.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interval::{ensure_sorted, BusyInterval};
use crate::policy::WorkPolicy;

/// An open slot. Only the start is stored; the reserved end (slot length) and
/// the billable end are derived from the policy and never interchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpenSlot {
    pub start: NaiveDateTime,
}

impl OpenSlot {
    /// End of the slot when it lasts `length`.
    pub fn end(&self, length: Duration) -> NaiveDateTime {
        self.start + length
    }

    /// End of the time held on the calendar: `start + slot_duration`.
    pub fn reserved_end(&self, policy: &WorkPolicy) -> NaiveDateTime {
        self.end(policy.slot_duration())
    }

    /// End of the time offered to the other party: `start + billable_duration`.
    pub fn billable_end(&self, policy: &WorkPolicy) -> NaiveDateTime {
        self.end(policy.billable_duration())
    }
}

/// Generate every policy-valid candidate start in `[now's date, horizon_end's date]`.
///
/// The result is strictly increasing. A candidate is emitted only when both
/// its start and `start + slot_duration` fall inside the day's work window, and
/// its start is before `horizon_end`.
pub fn candidate_starts(
    now: NaiveDateTime,
    horizon_end: NaiveDateTime,
    policy: &WorkPolicy,
) -> Vec<NaiveDateTime> {
    let step = policy.slot_duration();
    let first_day = now.date();
    let last_day = horizon_end.date();
    let next_hour = now.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(now.hour()) + 1);

    let mut candidates = Vec::new();
    for date in first_day.iter_days().take_while(|d| *d <= last_day) {
        if !policy.is_workday(date) {
            continue;
        }
        let day_start = date.and_time(policy.work_start());
        let day_end = date.and_time(policy.work_end());

        let mut point = if date == first_day { next_hour } else { day_start };
        // Bounded by the day's work end, so a step never rolls over midnight
        // into the next date's window.
        while point < day_end && point < horizon_end {
            if point >= day_start && point + step <= day_end {
                candidates.push(point);
            }
            point += step;
        }
    }
    candidates
}

/// Compute the open slots between `now` and `horizon_end`.
///
/// `busy` must be sorted ascending by start; it is checked up front. The busy
/// cursor only ever moves forward: for each candidate it skips intervals that
/// end at or before the candidate's start, then tests the candidate against the
/// interval it lands on. Because starts are sorted, if that interval does not
/// overlap the candidate, no later one can either.
///
/// # Errors
/// Returns `SlotError::UnsortedInput` if `busy` is out of order, or
/// `SlotError::InvalidInterval` if any interval does not end after it starts.
pub fn compute_open_slots(
    now: NaiveDateTime,
    horizon_end: NaiveDateTime,
    busy: &[BusyInterval],
    policy: &WorkPolicy,
) -> Result<Vec<OpenSlot>> {
    ensure_sorted(busy)?;

    let candidates = candidate_starts(now, horizon_end, policy);
    let mut open = Vec::with_capacity(candidates.len());
    let mut cursor = 0;

    for &start in &candidates {
        let slot = OpenSlot { start };
        let end = slot.reserved_end(policy);
        while cursor + 1 < busy.len() && start >= busy[cursor].end {
            cursor += 1;
        }
        let blocked = busy
            .get(cursor)
            .is_some_and(|interval| interval.overlaps(start, end));
        if !blocked {
            open.push(slot);
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        busy = busy.len(),
        open = open.len(),
        "computed open slots"
    );
    Ok(open)
}
