// File: ./src/ics.rs
//! iCalendar export of resolved reminders.
use crate::model::ResolvedOccurrence;
use chrono::{Days, NaiveDate};
use icalendar::{Calendar, Component, Event, Property};

const UID_DOMAIN: &str = "vault-timeline";

/// `RRULE` value for a reminder repeating every `interval` days.
pub fn recurrence_rule(interval: u32) -> String {
    format!("FREQ=DAILY;INTERVAL={}", interval)
}

fn date_property(key: &str, date: NaiveDate) -> Property {
    let mut prop = Property::new(key, date.format("%Y%m%d").to_string());
    prop.add_parameter("VALUE", "DATE");
    prop
}

/// One all-day VEVENT. DTEND is exclusive, so it is the following day.
pub fn to_event(occ: &ResolvedOccurrence) -> Event {
    let mut event = Event::new();
    event.uid(&format!("{}/{}@{}", occ.folder, occ.id, UID_DOMAIN));
    event.summary(&occ.id);
    event.description(&occ.folder);

    event.append_property(date_property("DTSTART", occ.effective_date));
    let end = occ
        .effective_date
        .checked_add_days(Days::new(1))
        .unwrap_or(occ.effective_date);
    event.append_property(date_property("DTEND", end));

    if let Some(interval) = occ.repeat_interval {
        event.add_property("RRULE", recurrence_rule(interval));
    }
    event.done()
}

pub fn build_calendar(occurrences: &[ResolvedOccurrence]) -> Calendar {
    let mut calendar = Calendar::new();
    for occ in occurrences {
        calendar.push(to_event(occ));
    }
    calendar.done()
}

pub fn to_ics_string(occurrences: &[ResolvedOccurrence]) -> String {
    build_calendar(occurrences).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(id: &str, date: NaiveDate, every: Option<u32>) -> ResolvedOccurrence {
        ResolvedOccurrence {
            id: id.to_string(),
            effective_date: date,
            repeat_interval: every,
            label_text: String::new(),
            folder: "Birthdays".to_string(),
        }
    }

    #[test]
    fn events_are_all_day_with_optional_rule() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let ics = to_ics_string(&[occ("Ana", day, Some(365)), occ("Dentist", day, None)]);

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("SUMMARY:Ana"));
        assert!(ics.contains("DESCRIPTION:Birthdays"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20250610"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250611"));
        assert!(ics.contains("UID:Birthdays/Ana@vault-timeline"));
        assert_eq!(ics.matches("RRULE:FREQ=DAILY;INTERVAL=365").count(), 1);
    }
}
