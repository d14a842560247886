// File: ./src/controller.rs
//! One timeline run: scan, resolve, group, classify, render, write.
//!
//! The reference day is fixed when the run starts. Problems with single notes
//! are collected and reported at the end; the run only fails when an input or
//! output file cannot be accessed, and then every distinct failure is listed.
use crate::config::Config;
use crate::error::TimelineError;
use crate::ics;
use crate::model::{ResolvedOccurrence, Timeline, classify, group, resolve_all};
use crate::render::render_document;
use crate::storage::Storage;
use crate::vault::scan_vault;
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Distinct messages in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages(Vec<String>);

impl Messages {
    pub fn push(&mut self, msg: impl fmt::Display) {
        let msg = msg.to_string();
        if !self.0.contains(&msg) {
            self.0.push(msg);
        }
    }

    pub fn extend_errors<'a, I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = &'a TimelineError>,
    {
        for e in errors {
            self.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

/// In-memory result of the pure part of a run.
#[derive(Debug, Clone)]
pub struct Preview {
    pub reference: NaiveDate,
    pub occurrences: Vec<ResolvedOccurrence>,
    pub timeline: Timeline,
    pub document: String,
    pub warnings: Messages,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub reference: NaiveDate,
    pub notes: usize,
    pub buckets: usize,
    pub elapsed: Duration,
    pub timeline_path: PathBuf,
    pub ical_path: Option<PathBuf>,
    pub warnings: Messages,
}

impl RunReport {
    pub fn summary(&self) -> String {
        format!(
            "Timeline created! 🎉| {} notes added in {:.2} seconds",
            self.notes,
            self.elapsed.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("timeline run failed with {} error(s)", .messages.len())]
pub struct RunFailure {
    pub messages: Messages,
}

impl From<anyhow::Error> for RunFailure {
    fn from(err: anyhow::Error) -> Self {
        let mut messages = Messages::default();
        messages.push(format!("{:#}", err));
        Self { messages }
    }
}

pub struct TimelineController<'a> {
    config: &'a Config,
    reference: NaiveDate,
}

impl<'a> TimelineController<'a> {
    pub fn new(config: &'a Config, reference: NaiveDate) -> Self {
        Self { config, reference }
    }

    /// Scans the vault and builds everything without touching output files.
    pub fn preview(&self) -> Result<Preview, RunFailure> {
        self.config.validate().map_err(anyhow::Error::from)?;
        let scan = scan_vault(self.config)?;

        if !scan.failures.is_empty() {
            let mut messages = Messages::default();
            for failure in &scan.failures {
                messages.push(format!("{:#}", failure));
            }
            return Err(RunFailure { messages });
        }

        let mut warnings = Messages::default();
        warnings.extend_errors(&scan.skipped);

        let (occurrences, resolve_errors) = resolve_all(&scan.reminders, self.reference);
        warnings.extend_errors(&resolve_errors);

        let (mode, mode_errors) = self.config.timeline_mode();
        warnings.extend_errors(&mode_errors);

        let groups = group(&occurrences);
        let timeline = classify(&groups, self.reference, &mode, self.config.sort);
        let document = render_document(&self.config.template, &timeline);

        log::info!(
            "{} reminders on {} dates, {} buckets (reference {})",
            occurrences.len(),
            groups.len(),
            timeline.len(),
            self.reference
        );

        Ok(Preview {
            reference: self.reference,
            occurrences,
            timeline,
            document,
            warnings,
        })
    }

    /// Full run: builds the preview, then writes the timeline and, when
    /// enabled, the calendar file.
    pub fn run(&self) -> Result<RunReport, RunFailure> {
        let started = Instant::now();
        let preview = self.preview()?;

        let mut failures = Messages::default();
        let timeline_path = self.config.timeline_path();
        if let Err(e) = Storage::write_locked(&timeline_path, &preview.document) {
            failures.push(format!("{:#}", e));
        }

        let ical_path = self.config.ical_enable.then(|| self.config.ical_path());
        if let Some(path) = &ical_path {
            let ics = ics::to_ics_string(&preview.occurrences);
            if let Err(e) = Storage::write_locked(path, ics) {
                failures.push(format!("{:#}", e));
            }
        }

        if !failures.is_empty() {
            return Err(RunFailure { messages: failures });
        }

        Ok(RunReport {
            reference: preview.reference,
            notes: preview.occurrences.len(),
            buckets: preview.timeline.len(),
            elapsed: started.elapsed(),
            timeline_path,
            ical_path,
            warnings: preview.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_distinct_in_first_seen_order() {
        let mut msgs = Messages::default();
        msgs.push("b");
        msgs.push("a");
        msgs.push("b");
        assert_eq!(msgs.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
