//! # slot-engine
//!
//! Deterministic open-slot computation for a single calendar owner.
//!
//! Given a time horizon, a start-sorted list of busy intervals and a recurring
//! daily work window, the engine walks a fixed grid of candidate slots, drops
//! every candidate that collides with a busy interval, and groups the survivors
//! by calendar day into a compact, paste-ready availability summary.
//!
//! All times are naive local instants: callers normalize to a single local
//! time zone before handing data to the engine.
//!
//! ## Modules
//!
//! - [`interval`] — busy intervals, the half-open overlap rule, ordering checks
//! - [`policy`] — validated work-hour policy and meeting-type presets
//! - [`slots`] — candidate grid generation and the two-pointer overlap filter
//! - [`report`] — per-day grouping and text rendering
//! - [`error`] — Error types

pub mod error;
pub mod interval;
pub mod policy;
pub mod report;
pub mod slots;

pub use error::{Result, SlotError};
pub use interval::{is_overlap, BusyInterval};
pub use policy::{MeetingType, WorkPolicy};
pub use report::{render_report, AvailabilityReport, DaySlots};
pub use slots::{compute_open_slots, OpenSlot};
