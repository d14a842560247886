// File: ./src/model/reminder.rs
use chrono::NaiveDate;

/// A reminder as extracted from a note, before any date handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReminder {
    /// Note identifier (file stem).
    pub id: String,
    /// Raw date string, optionally carrying a time of day.
    pub date: String,
    /// Recurrence interval in days. Non-positive values mean "does not repeat".
    pub repeat_interval: Option<i64>,
    /// Header level 1-6 used instead of the folder symbol.
    pub priority: Option<u8>,
    /// Pre-built backlink line rendered in the timeline.
    pub label_text: String,
    /// Name of the directory containing the note.
    pub folder: String,
}

impl RawReminder {
    pub fn new(id: impl Into<String>, date: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label_text: format!("[[{}]]", id),
            id,
            date: date.into(),
            repeat_interval: None,
            priority: None,
            folder: String::new(),
        }
    }

    pub fn every(mut self, days: i64) -> Self {
        self.repeat_interval = Some(days);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label_text = label.into();
        self
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }
}

/// A reminder placed on its effective date relative to the reference day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOccurrence {
    pub id: String,
    pub effective_date: NaiveDate,
    /// Normalized interval: always `Some(n)` with `n > 0`, or `None`.
    pub repeat_interval: Option<u32>,
    pub label_text: String,
    pub folder: String,
}

impl ResolvedOccurrence {
    pub fn is_recurring(&self) -> bool {
        self.repeat_interval.is_some()
    }
}
