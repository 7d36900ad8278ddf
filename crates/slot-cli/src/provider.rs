//! Sources of busy intervals.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use slot_engine::interval::sort_intervals;
use slot_engine::BusyInterval;

use crate::cache;

/// Anything that can list the busy intervals in a time range.
///
/// Implementations return intervals sorted ascending by start, with times
/// already in the owner's local zone.
pub trait CalendarDataProvider {
    fn busy_intervals(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BusyInterval>>;
}

impl<P: CalendarDataProvider + ?Sized> CalendarDataProvider for &P {
    fn busy_intervals(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BusyInterval>> {
        (**self).busy_intervals(start, end)
    }
}

/// Whether a [`CachedProvider`] may answer from the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Use the cache when present, otherwise fetch and store.
    Prefer,
    /// Always fetch, then overwrite the cache.
    Refresh,
}

/// Read-through cache in front of another provider.
pub struct CachedProvider<P> {
    inner: P,
    path: PathBuf,
    mode: CacheMode,
}

impl<P: CalendarDataProvider> CachedProvider<P> {
    pub fn new(inner: P, path: impl Into<PathBuf>, mode: CacheMode) -> Self {
        Self {
            inner,
            path: path.into(),
            mode,
        }
    }
}

impl<P: CalendarDataProvider> CalendarDataProvider for CachedProvider<P> {
    fn busy_intervals(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BusyInterval>> {
        if self.mode == CacheMode::Prefer {
            if let Some(mut events) = cache::load(&self.path)? {
                // The file may have been edited by hand.
                sort_intervals(&mut events);
                tracing::info!(events = events.len(), "using cached events");
                return Ok(events);
            }
            tracing::info!(path = %self.path.display(), "no cached events, fetching");
        }

        let events = self.inner.busy_intervals(start, end)?;
        cache::store(&self.path, &events)?;
        Ok(events)
    }
}
