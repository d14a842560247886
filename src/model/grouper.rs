// File: ./src/model/grouper.rs
use crate::model::reminder::ResolvedOccurrence;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Label texts keyed by effective date.
///
/// Keys iterate in ascending date order; each key keeps its labels in the
/// order the occurrences were grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateGroup {
    days: BTreeMap<NaiveDate, Vec<String>>,
}

impl DateGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: NaiveDate, label: impl Into<String>) {
        self.days.entry(date).or_default().push(label.into());
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&[String]> {
        self.days.get(date).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&NaiveDate, &Vec<String>)> {
        self.days.iter()
    }

    pub fn dates(&self) -> impl DoubleEndedIterator<Item = &NaiveDate> {
        self.days.keys()
    }

    /// Number of distinct dates.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of labels across all dates.
    pub fn label_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Collects occurrences into a fresh [`DateGroup`]. Duplicates are kept.
pub fn group<'a, I>(occurrences: I) -> DateGroup
where
    I: IntoIterator<Item = &'a ResolvedOccurrence>,
{
    let mut groups = DateGroup::new();
    for occ in occurrences {
        groups.push(occ.effective_date, occ.label_text.clone());
    }
    groups
}
