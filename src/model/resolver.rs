// File: ./src/model/resolver.rs
//! Date normalization and roll-forward of expired recurring reminders.
use crate::error::{Result, TimelineError};
use crate::model::reminder::{RawReminder, ResolvedOccurrence};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d %Y", "%d %B %Y", "%B %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a free-form date string into a calendar date, dropping any time of day.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let cleaned = input.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if cleaned.is_empty() {
        return Err(TimelineError::invalid_date(input, "empty value"));
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Ok(dt.date_naive());
    }

    Err(TimelineError::invalid_date(input, "unrecognized date format"))
}

/// Drops zero and negative intervals.
pub fn normalize_interval(repeat_interval: Option<i64>) -> Option<u32> {
    repeat_interval
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

/// Returns the first occurrence on or after `reference`.
///
/// Dates not yet reached are returned as-is. A past date only moves when it
/// repeats, and lands on the smallest `original + n * interval` that is not
/// before `reference`.
pub fn resolve(
    original: NaiveDate,
    repeat_interval: Option<u32>,
    reference: NaiveDate,
) -> Result<NaiveDate> {
    if original >= reference {
        return Ok(original);
    }
    let Some(interval) = repeat_interval.filter(|n| *n > 0) else {
        return Ok(original);
    };

    let behind = (reference - original).num_days();
    let step = i64::from(interval);
    let jumps = (behind + step - 1) / step;
    let offset = u64::try_from(jumps * step)
        .map_err(|_| TimelineError::invalid_date(original.to_string(), "negative offset"))?;

    original.checked_add_days(Days::new(offset)).ok_or_else(|| {
        TimelineError::invalid_date(original.to_string(), "next occurrence is out of range")
    })
}

/// Parses and resolves one extracted reminder.
pub fn resolve_reminder(raw: &RawReminder, reference: NaiveDate) -> Result<ResolvedOccurrence> {
    let original = parse_date(&raw.date)?;
    let repeat_interval = normalize_interval(raw.repeat_interval);
    if repeat_interval.is_none() && raw.repeat_interval.is_some() {
        log::warn!(
            "Ignoring non-positive repeat interval {:?} on '{}'",
            raw.repeat_interval,
            raw.id
        );
    }

    Ok(ResolvedOccurrence {
        id: raw.id.clone(),
        effective_date: resolve(original, repeat_interval, reference)?,
        repeat_interval,
        label_text: raw.label_text.clone(),
        folder: raw.folder.clone(),
    })
}

/// Resolves every reminder, keeping input order. Failures are returned
/// alongside the successes instead of aborting the batch.
pub fn resolve_all(
    raws: &[RawReminder],
    reference: NaiveDate,
) -> (Vec<ResolvedOccurrence>, Vec<TimelineError>) {
    let mut resolved = Vec::with_capacity(raws.len());
    let mut errors = Vec::new();

    for raw in raws {
        match resolve_reminder(raw, reference) {
            Ok(occ) => resolved.push(occ),
            Err(e) => {
                log::warn!("Skipping reminder '{}': {}", raw.id, e);
                errors.push(e);
            }
        }
    }

    (resolved, errors)
}
