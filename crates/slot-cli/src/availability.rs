//! The availability command: fetch busy intervals, compute open slots, render.

use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::Local;
use slot_engine::report::render_header;
use slot_engine::{compute_open_slots, AvailabilityReport, SlotError};

use crate::cache;
use crate::cli::Cli;
use crate::config::Config;
use crate::graph::GraphCalendarProvider;
use crate::prompt;
use crate::provider::{CacheMode, CachedProvider, CalendarDataProvider};

/// Run against the calendar API, prompting on stdin/stderr and printing to stdout.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr();

    let connect = |calendars: CacheMode| -> Result<GraphCalendarProvider> {
        Ok(GraphCalendarProvider::from_config(config)?.with_calendar_mode(calendars))
    };
    let text = execute(cli, config, connect, &mut input, &mut prompts)?;

    println!();
    println!("{}", text);
    println!();

    if !cli.no_clipboard {
        copy_output(&text, copy_to_clipboard, &mut prompts)?;
    }

    if let Some(path) = &cli.output {
        fs::write(path, &text).with_context(|| format!("Failed to write file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote availability");
    }
    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("No clipboard available")?;
    clipboard.set_text(text).context("Failed to set clipboard text")?;
    Ok(())
}

/// Hand `text` to `copy` and report the outcome on `status`. A clipboard that
/// cannot be reached is not fatal: the text is already on stdout.
fn copy_output<F, W>(text: &str, copy: F, status: &mut W) -> Result<()>
where
    F: FnOnce(&str) -> Result<()>,
    W: Write,
{
    match copy(text) {
        Ok(()) => writeln!(status, "Copied to clipboard")?,
        Err(err) => tracing::warn!("clipboard not updated: {:#}", err),
    }
    Ok(())
}

/// Produce the availability text (or JSON) for one invocation.
///
/// `connect` builds the calendar source and is told whether cached calendars
/// may be reused; that source is consulted through the events cache.
/// Questions not answered by flags are asked on `prompts` and read from `input`.
pub fn execute<P, C, R, W>(cli: &Cli, config: &Config, connect: C, input: &mut R, prompts: &mut W) -> Result<String>
where
    P: CalendarDataProvider,
    C: FnOnce(CacheMode) -> Result<P>,
    R: BufRead,
    W: Write,
{
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    let horizon_end = config.horizon_end(now);
    tracing::debug!(%now, %horizon_end, "search window");

    let mode = cache_mode(cli, config, input, prompts)?;
    let fetching = mode == CacheMode::Refresh || !cache::exists(&config.cache_path);
    let calendars = if fetching {
        calendar_mode(cli, config, input, prompts)?
    } else {
        CacheMode::Prefer
    };
    let source = connect(calendars)?;
    let meeting = match cli.meeting_type {
        Some(meeting) => meeting,
        None => prompt::ask_meeting_type(input, prompts).context("Failed to read meeting type")?,
    };
    let policy = config.work_policy(meeting)?;

    let provider = CachedProvider::new(source, &config.cache_path, mode);
    let busy = provider.busy_intervals(now, horizon_end)?;
    let slots = compute_open_slots(now, horizon_end, &busy, &policy)?;
    let report = AvailabilityReport::group(&slots);
    tracing::info!(days = report.days.len(), slots = report.slot_count(), "availability computed");

    if cli.json {
        return Ok(report.to_json_pretty()?);
    }
    match report.render(policy.billable_duration(), &config.zone_label) {
        Ok(text) => Ok(text),
        Err(SlotError::EmptyReport) => {
            tracing::warn!("no open slots before the horizon");
            Ok(render_header(policy.billable_duration(), &config.zone_label))
        }
        Err(err) => Err(err.into()),
    }
}

/// Flags win; otherwise ask, but only when there is a cache to reuse.
fn cache_mode<R: BufRead, W: Write>(cli: &Cli, config: &Config, input: &mut R, prompts: &mut W) -> Result<CacheMode> {
    if cli.cached {
        return Ok(CacheMode::Prefer);
    }
    if cli.refresh || !cache::exists(&config.cache_path) {
        return Ok(CacheMode::Refresh);
    }
    let reuse = prompt::ask_yes_no(input, prompts, "Use cached events? ", Some(false))
        .context("Failed to read cache choice")?;
    Ok(if reuse { CacheMode::Prefer } else { CacheMode::Refresh })
}

/// Same rules as [`cache_mode`] for the calendar list, but reuse is the default.
fn calendar_mode<R: BufRead, W: Write>(cli: &Cli, config: &Config, input: &mut R, prompts: &mut W) -> Result<CacheMode> {
    if cli.cached {
        return Ok(CacheMode::Prefer);
    }
    if cli.refresh || !cache::exists(&config.calendar_cache_path) {
        return Ok(CacheMode::Refresh);
    }
    let reuse = prompt::ask_yes_no(input, prompts, "Use cached calendars? ", Some(true))
        .context("Failed to read calendar cache choice")?;
    Ok(if reuse { CacheMode::Prefer } else { CacheMode::Refresh })
}
