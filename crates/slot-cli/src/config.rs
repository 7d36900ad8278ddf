//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use slot_engine::{MeetingType, WorkPolicy};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// ISO weekday numbers (1 = Monday … 7 = Sunday) on which slots are offered.
    pub workdays: Vec<u32>,
    /// Daily work start, `HH:MM`.
    pub work_start: String,
    /// Daily work end, `HH:MM`.
    pub work_end: String,
    /// Days after today covered by the search; the horizon ends at 23:59:59.
    pub horizon_days: u32,
    /// Zone wording shown in the report header.
    pub zone_label: String,
    /// File holding the last fetched busy intervals.
    pub cache_path: PathBuf,
    /// File holding the calendars selected by the last calendar-list request.
    pub calendar_cache_path: PathBuf,
    /// Mailbox whose calendars are read.
    pub user_principal_name: String,
    /// Calendars (by display name) whose events block availability.
    pub calendar_names: Vec<String>,
    /// Bearer token for the calendar API.
    pub access_token: Option<String>,
    pub graph_base_url: String,
    /// Windows zone name the calendar API reports local times in.
    pub outlook_timezone: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workdays", &self.workdays)
            .field("work_start", &self.work_start)
            .field("work_end", &self.work_end)
            .field("horizon_days", &self.horizon_days)
            .field("zone_label", &self.zone_label)
            .field("cache_path", &self.cache_path)
            .field("calendar_cache_path", &self.calendar_cache_path)
            .field("user_principal_name", &self.user_principal_name)
            .field("calendar_names", &self.calendar_names)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("graph_base_url", &self.graph_base_url)
            .field("outlook_timezone", &self.outlook_timezone)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("cache"));
        Self {
            workdays: vec![1, 2, 3, 4, 5, 6],
            work_start: "15:00".to_string(),
            work_end: "21:00".to_string(),
            horizon_days: 14,
            zone_label: slot_engine::report::DEFAULT_ZONE_LABEL.to_string(),
            cache_path: data_dir.join("events.json"),
            calendar_cache_path: data_dir.join("calendars.json"),
            user_principal_name: String::new(),
            calendar_names: vec!["Calendar".to_string(), "Tutoring".to_string()],
            access_token: None,
            graph_base_url: "https://graph.microsoft.com/v1.0".to_string(),
            outlook_timezone: "GMT Standard Time".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// An explicit file replaces the user's `config.toml` rather than layering
    /// on top of it.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_path {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                if let Some(config_dir) = dirs_config_path() {
                    figment = figment.merge(Toml::file(config_dir.join("config.toml")));
                }
            }
        }

        // Load from environment variables (SLOTS_*)
        figment = figment.merge(Env::prefixed("SLOTS_"));

        figment.extract()
    }

    /// Build the validated work policy for a meeting type.
    pub fn work_policy(&self, meeting: MeetingType) -> Result<WorkPolicy> {
        let work_start = parse_clock(&self.work_start).context("invalid work_start")?;
        let work_end = parse_clock(&self.work_end).context("invalid work_end")?;
        let policy = WorkPolicy::new(
            self.workdays.iter().copied(),
            work_start,
            work_end,
            meeting.slot_duration(),
            meeting.billable_duration(),
        )?;
        Ok(policy)
    }

    /// Last instant considered: `horizon_days` after `now`, at 23:59:59.
    pub fn horizon_end(&self, now: NaiveDateTime) -> NaiveDateTime {
        let day_after = (now + Duration::days(i64::from(self.horizon_days) + 1)).date();
        day_after.and_time(NaiveTime::MIN) - Duration::seconds(1)
    }
}

/// Parse `HH:MM` (seconds optional).
fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .with_context(|| format!("expected HH:MM, got '{}'", value))
}

/// Returns the platform-specific config directory for slots.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("slots"))
}

/// Returns the platform-specific data directory for slots.
///
/// On Linux: `~/.local/share/slots`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("slots"))
}
