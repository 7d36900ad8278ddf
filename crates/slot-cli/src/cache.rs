//! On-disk caches of the last fetched busy intervals and calendar list.
//!
//! The events cache is a single JSON array of `{subject, startDateTime,
//! endDateTime}` objects; the calendar cache is an array of `{id, name}`. Both
//! are pretty-printed with two-space indentation.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use slot_engine::BusyInterval;

use crate::graph::CalendarRef;

/// Read the events cache. A missing file is `Ok(None)`, not an error.
pub fn load(path: &Path) -> Result<Option<Vec<BusyInterval>>> {
    let events: Option<Vec<BusyInterval>> = read_json(path)?;
    if let Some(events) = &events {
        tracing::debug!(path = %path.display(), events = events.len(), "loaded cached events");
    }
    Ok(events)
}

/// Overwrite the events cache, creating its directory if needed.
pub fn store(path: &Path, events: &[BusyInterval]) -> Result<()> {
    write_json(path, events)?;
    tracing::debug!(path = %path.display(), events = events.len(), "cached events");
    Ok(())
}

/// Read the calendar cache. A missing file is `Ok(None)`.
pub fn load_calendars(path: &Path) -> Result<Option<Vec<CalendarRef>>> {
    read_json(path)
}

pub fn store_calendars(path: &Path, calendars: &[CalendarRef]) -> Result<()> {
    write_json(path, calendars)?;
    tracing::info!(path = %path.display(), calendars = calendars.len(), "cached calendars");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read cache: {}", path.display()))
        }
    };
    let value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse cache: {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write cache: {}", path.display()))
}

pub fn exists(path: &Path) -> bool {
    path.is_file()
}
