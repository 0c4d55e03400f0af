//! Record types stored per user.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// User id → that user's records, in insertion order.
pub type UserMap<T> = BTreeMap<String, Vec<T>>;

/// A to-do item for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub date: NaiveDate,
}

impl Task {
    pub fn new(text: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            text: text.into(),
            done: false,
            date,
        }
    }
}

/// When a reminder is meant to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Fires once today, then is removed.
    Today,
    /// Fires on its `date`.
    OtherDay,
    /// Fires every day; can be paused.
    Daily,
}

/// A timed notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub text: String,
    pub time: HourMinute,
    pub kind: ReminderKind,
    /// Present iff `kind` is `OtherDay`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub fired_today: bool,
}

fn enabled_default() -> bool {
    true
}

impl Reminder {
    pub fn new(
        text: impl Into<String>,
        time: HourMinute,
        kind: ReminderKind,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            time,
            kind,
            date: if kind == ReminderKind::OtherDay {
                date
            } else {
                None
            },
            enabled: true,
            fired_today: false,
        }
    }

    /// Whether a sweep at `now` should deliver this reminder.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        if !self.enabled || self.fired_today || self.time != HourMinute::of(now.time()) {
            return false;
        }
        match self.kind {
            ReminderKind::OtherDay => self.date == Some(now.date()),
            ReminderKind::Today | ReminderKind::Daily => true,
        }
    }
}

/// Someone's birthday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub name: String,
    pub date: NaiveDate,
}

/// A dated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub date: NaiveDate,
}

/// The task list of one user as it stood at a daily reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Wall-clock hour and minute, serialized as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HourMinute {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseHourMinuteError {
    #[error("expected HH:MM, got '{0}'")]
    Format(String),
    #[error("time out of range: '{0}'")]
    Range(String),
}

impl HourMinute {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Truncate a time of day to its minute.
    pub fn of(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for HourMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for HourMinute {
    type Err = ParseHourMinuteError;

    /// Accepts `H:M` with one or two digits per part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| ParseHourMinuteError::Format(trimmed.to_string()))?;
        let parse_part = |part: &str| -> Result<u8, ParseHourMinuteError> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseHourMinuteError::Format(trimmed.to_string()));
            }
            part.parse()
                .map_err(|_| ParseHourMinuteError::Format(trimmed.to_string()))
        };
        let (hour, minute) = (parse_part(h)?, parse_part(m)?);
        Self::new(hour, minute).ok_or_else(|| ParseHourMinuteError::Range(trimmed.to_string()))
    }
}

impl TryFrom<String> for HourMinute {
    type Error = ParseHourMinuteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HourMinute> for String {
    fn from(value: HourMinute) -> Self {
        value.to_string()
    }
}
