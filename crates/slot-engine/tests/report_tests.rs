//! Tests for day grouping, ordinal suffixes and text rendering.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use slot_engine::report::{format_day_heading, ordinal_suffix, render_header, DEFAULT_ZONE_LABEL};
use slot_engine::{render_report, AvailabilityReport, OpenSlot, SlotError};

/// 2024-01-01 is a Monday.
fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn slot(day: u32, hour: u32, min: u32) -> OpenSlot {
    OpenSlot {
        start: at(day, hour, min),
    }
}

// ── Ordinal suffix ──────────────────────────────────────────────────────────

#[test]
fn ordinal_suffix_scenarios() {
    assert_eq!(ordinal_suffix(1), "st");
    assert_eq!(ordinal_suffix(2), "nd");
    assert_eq!(ordinal_suffix(3), "rd");
    assert_eq!(ordinal_suffix(4), "th");
    assert_eq!(ordinal_suffix(11), "th");
    assert_eq!(ordinal_suffix(12), "th");
    assert_eq!(ordinal_suffix(13), "th");
    assert_eq!(ordinal_suffix(20), "th");
    assert_eq!(ordinal_suffix(21), "st");
    assert_eq!(ordinal_suffix(22), "nd");
    assert_eq!(ordinal_suffix(23), "rd");
    assert_eq!(ordinal_suffix(24), "th");
    assert_eq!(ordinal_suffix(30), "th");
    assert_eq!(ordinal_suffix(31), "st");
}

#[test]
fn day_heading_format() {
    assert_eq!(
        format_day_heading(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        "Monday 1st January"
    );
    assert_eq!(
        format_day_heading(NaiveDate::from_ymd_opt(2024, 3, 23).unwrap()),
        "Saturday 23rd March"
    );
    assert_eq!(
        format_day_heading(NaiveDate::from_ymd_opt(2024, 12, 11).unwrap()),
        "Wednesday 11th December"
    );
}

// ── Grouping ────────────────────────────────────────────────────────────────

#[test]
fn grouping_preserves_order_and_omits_empty_days() {
    let slots = vec![
        slot(1, 15, 0),
        slot(1, 17, 0),
        slot(3, 16, 0),
        slot(4, 15, 0),
        slot(4, 20, 0),
    ];

    let report = AvailabilityReport::group(&slots);

    let dates: Vec<u32> = report
        .days
        .iter()
        .map(|d| chrono::Datelike::day(&d.date))
        .collect();
    assert_eq!(dates, vec![1, 3, 4]);
    assert_eq!(report.days[0].slots, vec![slot(1, 15, 0), slot(1, 17, 0)]);
    assert_eq!(report.slot_count(), 5);
}

#[test]
fn grouping_empty_input_is_empty() {
    let report = AvailabilityReport::group(&[]);

    assert!(report.is_empty());
    assert_eq!(report.slot_count(), 0);
}

// ── Rendering ───────────────────────────────────────────────────────────────

#[test]
fn renders_single_day_with_billable_ends() {
    let slots: Vec<OpenSlot> = (15..21).map(|h| slot(1, h, 0)).collect();

    let text = render_report(&slots, Duration::minutes(55)).unwrap();

    assert_eq!(
        text,
        "Current availability for a 55-minute session (UK local time):\n\
         Monday 1st January: 15:00-15:55, 16:00-16:55, 17:00-17:55, 18:00-18:55, 19:00-19:55, 20:00-20:55"
    );
}

#[test]
fn renders_one_line_per_day_without_trailing_separators() {
    let slots = vec![slot(1, 15, 0), slot(2, 16, 30), slot(2, 17, 0)];

    let text = render_report(&slots, Duration::minutes(15)).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Current availability for a 15-minute session (UK local time):"
    );
    assert_eq!(lines[1], "Monday 1st January: 15:00-15:15");
    assert_eq!(lines[2], "Tuesday 2nd January: 16:30-16:45, 17:00-17:15");
    assert!(!text.ends_with('\n'));
    assert!(!text.ends_with(", "));
}

#[test]
fn render_uses_custom_zone_label() {
    let report = AvailabilityReport::group(&[slot(1, 15, 0)]);

    let text = report.render(Duration::minutes(55), "CET").unwrap();

    assert!(text.starts_with("Current availability for a 55-minute session (CET):\n"));
}

#[test]
fn empty_report_is_an_error() {
    let err = render_report(&[], Duration::minutes(55)).unwrap_err();

    assert!(matches!(err, SlotError::EmptyReport));
}

#[test]
fn header_alone_for_empty_availability() {
    assert_eq!(
        render_header(Duration::minutes(55), DEFAULT_ZONE_LABEL),
        "Current availability for a 55-minute session (UK local time):"
    );
}

#[test]
fn report_serializes_to_json() {
    let report = AvailabilityReport::group(&[slot(1, 15, 0)]);

    let json = report.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["days"][0]["date"], "2024-01-01");
    assert_eq!(value["days"][0]["slots"][0]["start"], "2024-01-01T15:00:00");
}
