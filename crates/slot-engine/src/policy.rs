//! Work-hour policy and meeting-type presets.
//!
//! A [`WorkPolicy`] is validated once, at construction, and is immutable
//! afterwards: every value of the type satisfies the policy invariants, so the
//! slot computation never has to re-check them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::error::{Result, SlotError};

/// Recurring weekly schedule plus the slot sizing used to build the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPolicy {
    workdays: BTreeSet<u32>,
    work_start: NaiveTime,
    work_end: NaiveTime,
    slot_duration: Duration,
    billable_duration: Duration,
}

impl WorkPolicy {
    /// Build a validated policy.
    ///
    /// `workdays` holds ISO weekday numbers (1 = Monday … 7 = Sunday).
    /// `slot_duration` is both the grid step and the reserved length used for
    /// conflict and boundary checks; `billable_duration` is only displayed.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidPolicy` when `workdays` is empty or holds a
    /// number outside 1–7, when `work_start >= work_end`, when either duration
    /// is not positive, or when `billable_duration > slot_duration`.
    pub fn new(
        workdays: impl IntoIterator<Item = u32>,
        work_start: NaiveTime,
        work_end: NaiveTime,
        slot_duration: Duration,
        billable_duration: Duration,
    ) -> Result<Self> {
        let workdays: BTreeSet<u32> = workdays.into_iter().collect();
        if workdays.is_empty() {
            return Err(SlotError::InvalidPolicy("no workdays given".to_string()));
        }
        if let Some(day) = workdays.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(SlotError::InvalidPolicy(format!(
                "weekday {} is outside 1-7",
                day
            )));
        }
        if work_start >= work_end {
            return Err(SlotError::InvalidPolicy(format!(
                "work start {} is not before work end {}",
                work_start.format("%H:%M"),
                work_end.format("%H:%M")
            )));
        }
        Self::check_durations(slot_duration, billable_duration)?;

        Ok(Self {
            workdays,
            work_start,
            work_end,
            slot_duration,
            billable_duration,
        })
    }

    /// Same schedule with a different slot/billable pair.
    pub fn with_durations(&self, slot_duration: Duration, billable_duration: Duration) -> Result<Self> {
        Self::check_durations(slot_duration, billable_duration)?;
        Ok(Self {
            slot_duration,
            billable_duration,
            ..self.clone()
        })
    }

    /// Same schedule sized for a meeting-type preset.
    pub fn for_meeting(&self, meeting: MeetingType) -> Self {
        Self {
            slot_duration: meeting.slot_duration(),
            billable_duration: meeting.billable_duration(),
            ..self.clone()
        }
    }

    fn check_durations(slot_duration: Duration, billable_duration: Duration) -> Result<()> {
        if slot_duration <= Duration::zero() {
            return Err(SlotError::InvalidPolicy(format!(
                "slot duration must be positive, got {} minutes",
                slot_duration.num_minutes()
            )));
        }
        if billable_duration <= Duration::zero() {
            return Err(SlotError::InvalidPolicy(format!(
                "billable duration must be positive, got {} minutes",
                billable_duration.num_minutes()
            )));
        }
        if billable_duration > slot_duration {
            return Err(SlotError::InvalidPolicy(format!(
                "billable duration ({} min) exceeds slot duration ({} min)",
                billable_duration.num_minutes(),
                slot_duration.num_minutes()
            )));
        }
        Ok(())
    }

    pub fn workdays(&self) -> &BTreeSet<u32> {
        &self.workdays
    }

    /// Whether slots may be offered on `date`.
    pub fn is_workday(&self, date: NaiveDate) -> bool {
        self.workdays.contains(&date.weekday().number_from_monday())
    }

    pub fn work_start(&self) -> NaiveTime {
        self.work_start
    }

    pub fn work_end(&self) -> NaiveTime {
        self.work_end
    }

    pub fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    pub fn billable_duration(&self) -> Duration {
        self.billable_duration
    }
}

impl Default for WorkPolicy {
    /// Monday to Saturday, 15:00–21:00, sized for a lesson.
    fn default() -> Self {
        Self {
            workdays: (1..=6).collect(),
            work_start: NaiveTime::MIN + Duration::hours(15),
            work_end: NaiveTime::MIN + Duration::hours(21),
            slot_duration: MeetingType::Lesson.slot_duration(),
            billable_duration: MeetingType::Lesson.billable_duration(),
        }
    }
}

/// Preset slot sizes offered to the person running the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeetingType {
    /// One-hour slot, 55 minutes billed.
    #[default]
    Lesson,
    /// Half-hour slot, 15 minutes billed.
    Meeting,
}

impl MeetingType {
    pub fn slot_duration(self) -> Duration {
        match self {
            MeetingType::Lesson => Duration::minutes(60),
            MeetingType::Meeting => Duration::minutes(30),
        }
    }

    pub fn billable_duration(self) -> Duration {
        match self {
            MeetingType::Lesson => Duration::minutes(55),
            MeetingType::Meeting => Duration::minutes(15),
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingType::Lesson => write!(f, "{}-minute lesson", self.billable_duration().num_minutes()),
            MeetingType::Meeting => write!(f, "{}-minute meeting", self.billable_duration().num_minutes()),
        }
    }
}

impl FromStr for MeetingType {
    type Err = String;

    /// Accepts the menu numbers (`1`, `2`) or the names (`lesson`, `meeting`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "lesson" => Ok(MeetingType::Lesson),
            "2" | "meeting" => Ok(MeetingType::Meeting),
            other => Err(format!("unknown meeting type '{}' (expected 1, 2, lesson or meeting)", other)),
        }
    }
}
