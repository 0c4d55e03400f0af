//! # daykeeper-store
//!
//! Per-user record collections (tasks, reminders, birthdays, events, task
//! history) persisted as whole-collection JSON snapshots.

pub mod model;
pub mod store;

pub use model::{
    Birthday, Event, HistoryEntry, HourMinute, ParseHourMinuteError, Reminder, ReminderKind, Task,
    UserMap,
};
pub use store::{CollectionGuard, SharedCollection, Store, StoreCounts};
