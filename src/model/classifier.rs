// File: ./src/model/classifier.rs
//! Assigns each date group to a labeled timeline bucket.
//!
//! Calendar mode places a date into the first matching tier:
//! Expired, Today, Tomorrow, weekday name (within 7 days), `Mon DD` (rest of
//! the current year), `Mon DD YYYY` (later). Every tier is half-open, so a
//! date equal to the upper boundary (`today + 7`, Dec 31) lands in the next
//! tier. Simple mode makes one bucket per date, optionally filtered.
use crate::error::TimelineError;
use crate::model::grouper::DateGroup;
use crate::model::resolver::parse_date;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const EXPIRED: &str = "Expired";
pub const TODAY: &str = "Today";
pub const TOMORROW: &str = "Tomorrow";

const WEEKDAY_FORMAT: &str = "%A";
const MONTH_DAY_FORMAT: &str = "%b %d";
const FULL_DATE_FORMAT: &str = "%b %d %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarOptions {
    pub show_expired: bool,
}

/// Dates kept by limited simple mode: an inclusive range plus loose extra days.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateLimits {
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub extra: Vec<NaiveDate>,
}

impl DateLimits {
    pub fn new(start: NaiveDate, end: NaiveDate, extra: Vec<NaiveDate>) -> Self {
        Self {
            range: Some((start, end)),
            extra,
        }
    }

    /// Builds limits from raw date keys, keeping every entry that parses.
    ///
    /// Each unparseable key is reported as [`TimelineError::MalformedDate`].
    /// If either range bound is bad the range is left unset.
    pub fn from_keys(start: &str, end: &str, extra: &[String]) -> (Self, Vec<TimelineError>) {
        let mut errors = Vec::new();
        let mut parse_key = |key: &str| match parse_date(key) {
            Ok(d) => Some(d),
            Err(_) => {
                errors.push(TimelineError::MalformedDate {
                    key: key.to_string(),
                });
                None
            }
        };

        let start = parse_key(start);
        let end = parse_key(end);
        let extra = extra.iter().filter_map(|k| parse_key(k.as_str())).collect();

        let range = match (start, end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        };
        (Self { range, extra }, errors)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let in_range = self
            .range
            .is_some_and(|(start, end)| start <= date && date <= end);
        in_range || self.extra.contains(&date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleOptions {
    /// `None` keeps every date.
    pub limits: Option<DateLimits>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineMode {
    Calendar(CalendarOptions),
    Simple(SimpleOptions),
}

impl Default for TimelineMode {
    fn default() -> Self {
        TimelineMode::Calendar(CalendarOptions { show_expired: true })
    }
}

/// One labeled section of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub entries: Vec<String>,
}

/// Ordered buckets with unique labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    buckets: Vec<Bucket>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entries` to the bucket called `label`, creating it at the end
    /// if it does not exist yet.
    pub fn extend(&mut self, label: &str, entries: &[String]) {
        match self.buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.entries.extend_from_slice(entries),
            None => self.buckets.push(Bucket {
                label: label.to_string(),
                entries: entries.to_vec(),
            }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.entries.as_slice())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Boundary dates derived once from the reference day.
#[derive(Debug, Clone, Copy)]
struct Horizon {
    today: NaiveDate,
    tomorrow: NaiveDate,
    this_week: NaiveDate,
    this_year: NaiveDate,
}

impl Horizon {
    fn new(today: NaiveDate) -> Self {
        use chrono::Datelike;

        let after = |days: u64| today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
        Self {
            today,
            tomorrow: after(1),
            this_week: after(7),
            this_year: NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }

    fn calendar_label(&self, date: NaiveDate, opts: CalendarOptions) -> Option<String> {
        if date < self.today {
            return opts.show_expired.then(|| EXPIRED.to_string());
        }
        let label = if date == self.today {
            TODAY.to_string()
        } else if date == self.tomorrow {
            TOMORROW.to_string()
        } else if date < self.this_week {
            date.format(WEEKDAY_FORMAT).to_string()
        } else if date < self.this_year {
            date.format(MONTH_DAY_FORMAT).to_string()
        } else {
            full_date_label(date)
        };
        Some(label)
    }
}

pub fn full_date_label(date: NaiveDate) -> String {
    date.format(FULL_DATE_FORMAT).to_string()
}

/// Buckets every date group for the given reference day.
///
/// Dates are visited in `sort` order; labels shared by several dates
/// (`Expired`) accumulate their entries in that order. Dropped dates (expired
/// while hidden, or outside simple-mode limits) appear nowhere.
pub fn classify(
    groups: &DateGroup,
    reference: NaiveDate,
    mode: &TimelineMode,
    sort: SortDirection,
) -> Timeline {
    let ordered: Box<dyn Iterator<Item = (&NaiveDate, &Vec<String>)> + '_> = match sort {
        SortDirection::Ascending => Box::new(groups.iter()),
        SortDirection::Descending => Box::new(groups.iter().rev()),
    };

    let mut timeline = Timeline::new();
    match mode {
        TimelineMode::Calendar(opts) => {
            let horizon = Horizon::new(reference);
            for (date, entries) in ordered {
                if let Some(label) = horizon.calendar_label(*date, *opts) {
                    timeline.extend(&label, entries);
                }
            }
        }
        TimelineMode::Simple(opts) => {
            for (date, entries) in ordered {
                let keep = opts
                    .limits
                    .as_ref()
                    .is_none_or(|limits| limits.contains(*date));
                if keep {
                    timeline.extend(&full_date_label(*date), entries);
                }
            }
        }
    }

    log::debug!(
        "Classified {} dates into {} buckets",
        groups.len(),
        timeline.len()
    );
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn upper_boundaries_fall_into_next_tier() {
        let horizon = Horizon::new(d(2025, 6, 10));
        let opts = CalendarOptions { show_expired: true };

        assert_eq!(
            horizon.calendar_label(d(2025, 6, 16), opts).as_deref(),
            Some("Monday")
        );
        assert_eq!(
            horizon.calendar_label(d(2025, 6, 17), opts).as_deref(),
            Some("Jun 17")
        );
        assert_eq!(
            horizon.calendar_label(d(2025, 12, 30), opts).as_deref(),
            Some("Dec 30")
        );
        assert_eq!(
            horizon.calendar_label(d(2025, 12, 31), opts).as_deref(),
            Some("Dec 31 2025")
        );
    }

    #[test]
    fn week_window_wins_across_new_year() {
        let horizon = Horizon::new(d(2025, 12, 28));
        let opts = CalendarOptions::default();

        assert_eq!(
            horizon.calendar_label(d(2025, 12, 31), opts).as_deref(),
            Some("Wednesday")
        );
        assert_eq!(
            horizon.calendar_label(d(2026, 1, 3), opts).as_deref(),
            Some("Saturday")
        );
        assert_eq!(
            horizon.calendar_label(d(2026, 1, 4), opts).as_deref(),
            Some("Jan 04 2026")
        );
        assert_eq!(horizon.calendar_label(d(2025, 12, 1), opts), None);
    }

    #[test]
    fn limits_report_each_malformed_key() {
        let (limits, errors) = DateLimits::from_keys(
            "2025-06-01",
            "not a date",
            &["2025-07-04".to_string(), "someday".to_string()],
        );

        assert_eq!(limits.range, None);
        assert_eq!(limits.extra, vec![d(2025, 7, 4)]);
        assert_eq!(
            errors,
            vec![
                TimelineError::MalformedDate {
                    key: "not a date".to_string()
                },
                TimelineError::MalformedDate {
                    key: "someday".to_string()
                },
            ]
        );
        assert!(limits.contains(d(2025, 7, 4)));
        assert!(!limits.contains(d(2025, 6, 15)));
    }
}
