//! Reply keyboards, menu actions, and the renderer-neutral `Reply`.

use crate::i18n::t;
use daykeeper_core::message::{Keyboard, OutgoingMessage};

/// Text plus optional quick actions, before a reply target is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// Text followed by the main menu.
    pub fn with_menu(text: impl Into<String>, lang: &str) -> Self {
        Self::new(text, Some(main_menu(lang)))
    }

    /// Whether the reply carries inline buttons.
    pub fn is_interactive(&self) -> bool {
        matches!(self.keyboard, Some(Keyboard::Inline { .. }))
    }

    pub fn into_outgoing(self, reply_target: Option<String>) -> OutgoingMessage {
        OutgoingMessage {
            text: self.text,
            keyboard: self.keyboard,
            reply_target,
            edit_message_id: None,
        }
    }
}

/// Something a reply-keyboard label asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddTask,
    Tasks,
    AddReminder,
    Reminders,
    MyDay,
    MyMonth,
    Events,
    Read,
    AddBirthday,
    AddEvent,
    EventList,
}

const LABELS: &[(&str, MenuAction)] = &[
    ("menu_add_task", MenuAction::AddTask),
    ("menu_tasks", MenuAction::Tasks),
    ("menu_add_reminder", MenuAction::AddReminder),
    ("menu_reminders", MenuAction::Reminders),
    ("menu_my_day", MenuAction::MyDay),
    ("menu_my_month", MenuAction::MyMonth),
    ("menu_events", MenuAction::Events),
    ("menu_read", MenuAction::Read),
    ("menu_birthday", MenuAction::AddBirthday),
    ("menu_event", MenuAction::AddEvent),
    ("menu_event_list", MenuAction::EventList),
];

impl MenuAction {
    /// Match a pressed reply-keyboard label.
    pub fn parse(text: &str, lang: &str) -> Option<Self> {
        let text = text.trim();
        LABELS
            .iter()
            .find(|(key, _)| t(key, lang) == text)
            .map(|(_, action)| *action)
    }
}

/// Whether `text` is the reserved cancel token.
pub fn is_cancel(text: &str, lang: &str) -> bool {
    let text = text.trim();
    // "/cancel@daykeeper_bot" in chats where commands carry the bot name.
    let command = text.split('@').next().unwrap_or(text);
    text == t("cancel", lang) || command.eq_ignore_ascii_case("/cancel")
}

fn rows(lang: &str, keys: &[&[&str]]) -> Keyboard {
    Keyboard::Menu {
        rows: keys
            .iter()
            .map(|row| row.iter().map(|k| t(k, lang).to_string()).collect())
            .collect(),
    }
}

pub fn main_menu(lang: &str) -> Keyboard {
    rows(
        lang,
        &[
            &["menu_add_task", "menu_tasks"],
            &["menu_add_reminder", "menu_reminders"],
            &["menu_my_day", "menu_my_month"],
            &["menu_events", "menu_read"],
        ],
    )
}

pub fn events_menu(lang: &str) -> Keyboard {
    rows(
        lang,
        &[
            &["menu_birthday", "menu_event"],
            &["menu_event_list", "cancel"],
        ],
    )
}

pub fn cancel_only(lang: &str) -> Keyboard {
    rows(lang, &[&["cancel"]])
}

pub fn task_day_choice(lang: &str) -> Keyboard {
    rows(lang, &[&["choice_today", "choice_other_day"], &["cancel"]])
}

pub fn reminder_kind_choice(lang: &str) -> Keyboard {
    rows(
        lang,
        &[&["choice_today", "choice_other_day"], &["choice_daily", "cancel"]],
    )
}
