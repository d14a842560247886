// File: ./src/model/mod.rs
pub mod classifier;
pub mod grouper;
pub mod reminder;
pub mod resolver;

pub use classifier::{
    Bucket, CalendarOptions, DateLimits, SimpleOptions, SortDirection, Timeline, TimelineMode,
    classify,
};
pub use grouper::{DateGroup, group};
pub use reminder::{RawReminder, ResolvedOccurrence};
pub use resolver::{parse_date, resolve, resolve_all, resolve_reminder};
