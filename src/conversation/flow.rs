//! Typed per-flow state machines.
//!
//! Each flow is linear. A step either advances to the next state, asks for
//! the same input again, or yields the finished record.

use crate::i18n::{self, t};
use crate::menu::{self, Reply};
use chrono::NaiveDate;
use daykeeper_store::{
    Birthday, Event, HourMinute, ParseHourMinuteError, Reminder, ReminderKind, Task,
};

/// A named multi-step conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Task,
    Reminder,
    Birthday,
    Event,
}

/// Current position of a user's active flow, with the fields collected so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Task(TaskStep),
    Reminder(ReminderStep),
    Birthday(BirthdayStep),
    Event(EventStep),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStep {
    AskDayType,
    AskOtherDate,
    /// `None` means today, resolved when the task is committed.
    AskText { date: Option<NaiveDate> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderStep {
    AskKind,
    AskText {
        kind: ReminderKind,
    },
    AskDate {
        kind: ReminderKind,
        text: String,
    },
    AskTime {
        kind: ReminderKind,
        text: String,
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthdayStep {
    AskName,
    AskDate { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStep {
    AskTitle,
    AskDate { title: String },
}

/// A completed record ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Task(Task),
    Reminder(Reminder),
    Birthday(Birthday),
    Event(Event),
}

/// Result of feeding one input into a session.
#[derive(Debug)]
pub enum Step {
    Next(Session),
    Retry(ValidationError),
    Commit(Record),
}

/// Input that does not fit the current state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unrecognized choice '{0}'")]
    Choice(String),
    #[error("expected a DD.MM.YYYY date, got '{0}'")]
    Date(String),
    #[error(transparent)]
    Time(#[from] ParseHourMinuteError),
    #[error("empty text")]
    EmptyText,
}

impl ValidationError {
    /// Localized explanation naming the expected format.
    pub fn message(&self, lang: &str) -> &'static str {
        match self {
            Self::Choice(_) => t("invalid_choice", lang),
            Self::Date(_) => t("invalid_date", lang),
            Self::Time(_) => t("invalid_time", lang),
            Self::EmptyText => t("empty_text", lang),
        }
    }
}

impl Flow {
    pub fn initial(self) -> Session {
        match self {
            Self::Task => Session::Task(TaskStep::AskDayType),
            Self::Reminder => Session::Reminder(ReminderStep::AskKind),
            Self::Birthday => Session::Birthday(BirthdayStep::AskName),
            Self::Event => Session::Event(EventStep::AskTitle),
        }
    }
}

impl Session {
    pub fn flow(&self) -> Flow {
        match self {
            Self::Task(_) => Flow::Task,
            Self::Reminder(_) => Flow::Reminder,
            Self::Birthday(_) => Flow::Birthday,
            Self::Event(_) => Flow::Event,
        }
    }

    /// The question for the current state.
    pub fn prompt(&self, lang: &str) -> Reply {
        let cancel = Some(menu::cancel_only(lang));
        match self {
            Self::Task(TaskStep::AskDayType) => Reply::new(
                t("ask_task_day", lang),
                Some(menu::task_day_choice(lang)),
            ),
            Self::Task(TaskStep::AskOtherDate) => Reply::new(t("ask_task_date", lang), cancel),
            Self::Task(TaskStep::AskText { date: None }) => {
                Reply::new(t("ask_task_text_today", lang), cancel)
            }
            Self::Task(TaskStep::AskText { date: Some(_) }) => {
                Reply::new(t("ask_task_text_other", lang), cancel)
            }
            Self::Reminder(ReminderStep::AskKind) => Reply::new(
                t("ask_reminder_kind", lang),
                Some(menu::reminder_kind_choice(lang)),
            ),
            Self::Reminder(ReminderStep::AskText { .. }) => {
                Reply::new(t("ask_reminder_text", lang), cancel)
            }
            Self::Reminder(ReminderStep::AskDate { .. }) => {
                Reply::new(t("ask_reminder_date", lang), cancel)
            }
            Self::Reminder(ReminderStep::AskTime { .. }) => {
                Reply::new(t("ask_reminder_time", lang), cancel)
            }
            Self::Birthday(BirthdayStep::AskName) => {
                Reply::new(t("ask_birthday_name", lang), cancel)
            }
            Self::Birthday(BirthdayStep::AskDate { .. }) => {
                Reply::new(t("ask_birthday_date", lang), cancel)
            }
            Self::Event(EventStep::AskTitle) => Reply::new(t("ask_event_title", lang), cancel),
            Self::Event(EventStep::AskDate { .. }) => {
                Reply::new(t("ask_event_date", lang), cancel)
            }
        }
    }

    /// Validate `input` against the current state.
    pub fn advance(&self, input: &str, today: NaiveDate, lang: &str) -> Step {
        match self.try_advance(input, today, lang) {
            Ok(step) => step,
            Err(e) => Step::Retry(e),
        }
    }

    fn try_advance(
        &self,
        input: &str,
        today: NaiveDate,
        lang: &str,
    ) -> Result<Step, ValidationError> {
        let step = match self {
            Self::Task(TaskStep::AskDayType) => {
                let next = match choice(input, lang, &["choice_today", "choice_other_day"])? {
                    "choice_today" => TaskStep::AskText { date: None },
                    _ => TaskStep::AskOtherDate,
                };
                Step::Next(Self::Task(next))
            }
            Self::Task(TaskStep::AskOtherDate) => Step::Next(Self::Task(TaskStep::AskText {
                date: Some(parse_date(input)?),
            })),
            Self::Task(TaskStep::AskText { date }) => Step::Commit(Record::Task(Task::new(
                parse_text(input)?,
                date.unwrap_or(today),
            ))),

            Self::Reminder(ReminderStep::AskKind) => {
                let kind = match choice(
                    input,
                    lang,
                    &["choice_today", "choice_other_day", "choice_daily"],
                )? {
                    "choice_today" => ReminderKind::Today,
                    "choice_other_day" => ReminderKind::OtherDay,
                    _ => ReminderKind::Daily,
                };
                Step::Next(Self::Reminder(ReminderStep::AskText { kind }))
            }
            Self::Reminder(ReminderStep::AskText { kind }) => {
                let text = parse_text(input)?;
                let next = if *kind == ReminderKind::OtherDay {
                    ReminderStep::AskDate { kind: *kind, text }
                } else {
                    ReminderStep::AskTime {
                        kind: *kind,
                        text,
                        date: None,
                    }
                };
                Step::Next(Self::Reminder(next))
            }
            Self::Reminder(ReminderStep::AskDate { kind, text }) => {
                Step::Next(Self::Reminder(ReminderStep::AskTime {
                    kind: *kind,
                    text: text.clone(),
                    date: Some(parse_date(input)?),
                }))
            }
            Self::Reminder(ReminderStep::AskTime { kind, text, date }) => {
                let time: HourMinute = input.trim().parse()?;
                Step::Commit(Record::Reminder(Reminder::new(
                    text.clone(),
                    time,
                    *kind,
                    *date,
                )))
            }

            Self::Birthday(BirthdayStep::AskName) => {
                Step::Next(Self::Birthday(BirthdayStep::AskDate {
                    name: parse_text(input)?,
                }))
            }
            Self::Birthday(BirthdayStep::AskDate { name }) => {
                Step::Commit(Record::Birthday(Birthday {
                    name: name.clone(),
                    date: parse_date(input)?,
                }))
            }

            Self::Event(EventStep::AskTitle) => Step::Next(Self::Event(EventStep::AskDate {
                title: parse_text(input)?,
            })),
            Self::Event(EventStep::AskDate { title }) => Step::Commit(Record::Event(Event {
                title: title.clone(),
                date: parse_date(input)?,
            })),
        };
        Ok(step)
    }
}

impl Record {
    /// Confirmation shown once the record is stored.
    pub fn confirmation(&self, lang: &str) -> String {
        match self {
            Self::Task(task) => i18n::task_added(lang, &task.text),
            Self::Reminder(r) => i18n::reminder_added(lang, &r.text, &r.time.to_string()),
            Self::Birthday(b) => i18n::birthday_added(lang, &b.name, b.date),
            Self::Event(e) => i18n::event_added(lang, &e.title, e.date),
        }
    }
}

/// Match `input` against the localized labels of `keys`; returns the key.
fn choice(input: &str, lang: &str, keys: &[&'static str]) -> Result<&'static str, ValidationError> {
    let input = input.trim();
    keys.iter()
        .copied()
        .find(|key| t(key, lang) == input)
        .ok_or_else(|| ValidationError::Choice(input.to_string()))
}

/// Parse a day-first `DD.MM.YYYY` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%d.%m.%Y")
        .map_err(|_| ValidationError::Date(input.to_string()))
}

fn parse_text(input: &str) -> Result<String, ValidationError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text.to_string())
}
