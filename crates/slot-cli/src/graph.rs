//! Microsoft Graph calendar-view client.
//!
//! Reads the owner's busy intervals from every configured calendar using an
//! already-issued bearer token. Obtaining or refreshing that token is left to
//! the caller.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use slot_engine::interval::sort_intervals;
use slot_engine::BusyInterval;

use crate::cache;
use crate::config::Config;
use crate::provider::{CacheMode, CalendarDataProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A calendar selected by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CalendarList {
    value: Vec<CalendarRef>,
}

#[derive(Debug, Deserialize)]
struct EventPage {
    value: Vec<GraphEvent>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphEvent {
    #[serde(default)]
    subject: Option<String>,
    start: GraphDateTime,
    end: GraphDateTime,
}

#[derive(Debug, Deserialize)]
struct GraphDateTime {
    #[serde(rename = "dateTime")]
    date_time: String,
}

pub struct GraphCalendarProvider {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    user_principal_name: String,
    calendar_names: Vec<String>,
    outlook_timezone: String,
    calendar_cache: PathBuf,
    calendar_mode: CacheMode,
}

impl GraphCalendarProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.graph_base_url.clone(),
            access_token: config.access_token.clone(),
            user_principal_name: config.user_principal_name.clone(),
            calendar_names: config.calendar_names.clone(),
            outlook_timezone: config.outlook_timezone.clone(),
            calendar_cache: config.calendar_cache_path.clone(),
            calendar_mode: CacheMode::Refresh,
        })
    }

    /// Whether the calendar list may come from the calendar cache.
    pub fn with_calendar_mode(mut self, mode: CacheMode) -> Self {
        self.calendar_mode = mode;
        self
    }

    fn token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("No access token configured. Set access_token in config.toml or SLOTS_ACCESS_TOKEN."))
    }

    /// `{base}/users/{upn}/calendars[/{id}/calendarView]`
    fn user_url(&self, tail: &[&str]) -> Result<Url> {
        if self.user_principal_name.is_empty() {
            bail!("No user_principal_name configured");
        }
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid graph_base_url: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("graph_base_url cannot be a base URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(["users", self.user_principal_name.as_str()])
            .extend(tail);
        Ok(url)
    }

    /// Calendars whose names are configured, from the calendar cache when
    /// allowed and present. A fresh list overwrites the cache.
    pub fn calendars(&self) -> Result<Vec<CalendarRef>> {
        if self.calendar_mode == CacheMode::Prefer {
            match cache::load_calendars(&self.calendar_cache)? {
                Some(calendars) if !calendars.is_empty() => {
                    tracing::info!(calendars = calendars.len(), "using cached calendars");
                    return Ok(calendars);
                }
                _ => tracing::info!(path = %self.calendar_cache.display(), "no cached calendars, fetching"),
            }
        }

        let url = self.user_url(&["calendars"])?;
        tracing::debug!(%url, "requesting calendar list");
        let list: CalendarList = self
            .client
            .get(url)
            .bearer_auth(self.token()?)
            .send()
            .context("Failed to request calendar list")?
            .error_for_status()
            .context("Calendar list request was rejected")?
            .json()
            .context("Failed to parse calendar list")?;

        let selected = select_calendars(list.value, &self.calendar_names);
        if selected.is_empty() {
            bail!("None of the configured calendars were found: {:?}", self.calendar_names);
        }
        cache::store_calendars(&self.calendar_cache, &selected)?;
        Ok(selected)
    }

    /// Every event in one calendar between `start` and `end`, following pagination.
    fn calendar_view(
        &self,
        calendar: &CalendarRef,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<BusyInterval>> {
        let mut url = self.user_url(&["calendars", calendar.id.as_str(), "calendarView"])?;
        url.query_pairs_mut()
            .append_pair("startDateTime", &start.format("%Y-%m-%dT%H:%M:%S").to_string())
            .append_pair("endDateTime", &end.format("%Y-%m-%dT%H:%M:%S").to_string())
            .append_pair("$orderby", "start/dateTime asc");

        let prefer = format!("outlook.timezone=\"{}\"", self.outlook_timezone);
        let mut events = Vec::new();
        let mut next = Some(url.to_string());
        while let Some(page_url) = next {
            tracing::debug!(calendar = %calendar.name, url = %page_url, "requesting calendar view");
            let page: EventPage = self
                .client
                .get(&page_url)
                .bearer_auth(self.token()?)
                .header("Prefer", &prefer)
                .send()
                .with_context(|| format!("Failed to request events for {}", calendar.name))?
                .error_for_status()
                .with_context(|| format!("Event request for {} was rejected", calendar.name))?
                .json()
                .with_context(|| format!("Failed to parse events for {}", calendar.name))?;
            next = page.next_link.clone();
            events.extend(intervals_from_page(page)?);
        }
        tracing::info!(calendar = %calendar.name, events = events.len(), "fetched events");
        Ok(events)
    }
}

impl CalendarDataProvider for GraphCalendarProvider {
    fn busy_intervals(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BusyInterval>> {
        let mut events = Vec::new();
        for calendar in self.calendars()? {
            events.extend(self.calendar_view(&calendar, start, end)?);
        }
        sort_intervals(&mut events);
        Ok(events)
    }
}

/// Keep calendars whose name is listed, in the order the API returned them.
fn select_calendars(calendars: Vec<CalendarRef>, names: &[String]) -> Vec<CalendarRef> {
    calendars
        .into_iter()
        .filter(|c| names.iter().any(|n| n == &c.name))
        .collect()
}

/// Convert one page of events. Events that do not end after they start block
/// nothing and are dropped.
fn intervals_from_page(page: EventPage) -> Result<Vec<BusyInterval>> {
    let mut intervals = Vec::with_capacity(page.value.len());
    for event in page.value {
        let subject = event.subject.unwrap_or_default();
        let start: NaiveDateTime = event
            .start
            .date_time
            .parse()
            .with_context(|| format!("Invalid start time for '{}': {}", subject, event.start.date_time))?;
        let end: NaiveDateTime = event
            .end
            .date_time
            .parse()
            .with_context(|| format!("Invalid end time for '{}': {}", subject, event.end.date_time))?;
        match BusyInterval::new(subject, start, end) {
            Ok(interval) => intervals.push(interval),
            Err(_) => tracing::warn!(%start, %end, "skipping event with empty duration"),
        }
    }
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn provider(base_url: &str, upn: &str) -> GraphCalendarProvider {
        let config = Config {
            graph_base_url: base_url.to_string(),
            user_principal_name: upn.to_string(),
            ..Config::default()
        };
        GraphCalendarProvider::from_config(&config).unwrap()
    }

    fn offline_provider(calendar_cache: PathBuf, mode: CacheMode) -> GraphCalendarProvider {
        // Nothing listens here, so any request fails fast.
        let config = Config {
            graph_base_url: "http://127.0.0.1:9/v1.0".to_string(),
            user_principal_name: "owner@example.com".to_string(),
            access_token: Some("token".to_string()),
            calendar_cache_path: calendar_cache,
            ..Config::default()
        };
        GraphCalendarProvider::from_config(&config)
            .unwrap()
            .with_calendar_mode(mode)
    }

    #[test]
    fn test_page_parses_graph_event_shape() {
        let json = r#"{
            "value": [
                {"subject": "Lesson", "start": {"dateTime": "2024-01-01T15:00:00.0000000", "timeZone": "GMT Standard Time"}, "end": {"dateTime": "2024-01-01T16:00:00.0000000", "timeZone": "GMT Standard Time"}},
                {"subject": "Reminder", "start": {"dateTime": "2024-01-01T17:00:00.0000000"}, "end": {"dateTime": "2024-01-01T17:00:00.0000000"}}
            ],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next?page=2"
        }"#;
        let page: EventPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_link.as_deref(), Some("https://graph.microsoft.com/v1.0/next?page=2"));

        let intervals = intervals_from_page(page).unwrap();
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].subject, "Lesson");
        assert_eq!(
            intervals[0].start,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(15, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let page: EventPage = serde_json::from_str(r#"{"value": []}"#).unwrap();
        assert!(page.next_link.is_none());
        assert!(intervals_from_page(page).unwrap().is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let json = r#"{"value": [{"subject": "x", "start": {"dateTime": "tomorrow"}, "end": {"dateTime": "2024-01-01T16:00:00"}}]}"#;
        let page: EventPage = serde_json::from_str(json).unwrap();
        assert!(intervals_from_page(page).is_err());
    }

    #[test]
    fn test_select_calendars_by_name() {
        let calendars = vec![
            CalendarRef { id: "a".into(), name: "Calendar".into() },
            CalendarRef { id: "b".into(), name: "Birthdays".into() },
            CalendarRef { id: "c".into(), name: "Tutoring".into() },
        ];
        let names = vec!["Tutoring".to_string(), "Calendar".to_string()];

        let ids: Vec<String> = select_calendars(calendars, &names).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_user_url_escapes_principal_name() {
        let url = provider("https://graph.microsoft.com/v1.0/", "jo smith@example.com")
            .user_url(&["calendars", "id-1", "calendarView"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/users/jo%20smith@example.com/calendars/id-1/calendarView"
        );
    }

    #[test]
    fn test_missing_token_is_reported() {
        let p = provider("https://graph.microsoft.com/v1.0", "me@example.com");
        let err = p.token().unwrap_err();
        assert!(err.to_string().contains("No access token"));
    }

    #[test]
    fn test_missing_principal_is_reported() {
        let err = provider("https://graph.microsoft.com/v1.0", "")
            .user_url(&["calendars"])
            .unwrap_err();
        assert!(err.to_string().contains("user_principal_name"));
    }

    #[test]
    fn test_cached_calendars_skip_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendars.json");
        let cached = vec![CalendarRef { id: "c".into(), name: "Tutoring".into() }];
        cache::store_calendars(&path, &cached).unwrap();

        let calendars = offline_provider(path, CacheMode::Prefer).calendars().unwrap();
        assert_eq!(calendars, cached);
    }

    #[test]
    fn test_refresh_ignores_cached_calendars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendars.json");
        cache::store_calendars(&path, &[CalendarRef { id: "c".into(), name: "Tutoring".into() }]).unwrap();

        let err = offline_provider(path, CacheMode::Refresh).calendars().unwrap_err();
        assert!(err.to_string().contains("Failed to request calendar list"));
    }

    #[test]
    fn test_empty_calendar_cache_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendars.json");
        cache::store_calendars(&path, &[]).unwrap();

        assert!(offline_provider(path, CacheMode::Prefer).calendars().is_err());
    }
}
