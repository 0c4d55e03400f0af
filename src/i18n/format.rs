//! Format helpers for strings with interpolation.

use super::t;
use chrono::NaiveDate;

/// Day-first display form of a stored ISO date.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn task_added(lang: &str, text: &str) -> String {
    match lang {
        "Russian" => format!("✅ Задача добавлена: {text}"),
        _ => format!("✅ Task added: {text}"),
    }
}

pub fn reminder_added(lang: &str, text: &str, time: &str) -> String {
    match lang {
        "Russian" => format!("✅ Напоминание добавлено: «{text}» в {time}"),
        _ => format!("✅ Reminder added: \"{text}\" at {time}"),
    }
}

pub fn birthday_added(lang: &str, name: &str, date: NaiveDate) -> String {
    let date = format_date(date);
    match lang {
        "Russian" => format!("✅ День рождения добавлен: {name} — {date}"),
        _ => format!("✅ Birthday added: {name} — {date}"),
    }
}

pub fn event_added(lang: &str, title: &str, date: NaiveDate) -> String {
    let date = format_date(date);
    match lang {
        "Russian" => format!("✅ Ивент добавлен: {title} — {date}"),
        _ => format!("✅ Event added: {title} — {date}"),
    }
}

/// Text of a fired reminder.
pub fn reminder_notification(lang: &str, text: &str) -> String {
    match lang {
        "Russian" => format!("🔔 Напоминание: {text}"),
        _ => format!("🔔 Reminder: {text}"),
    }
}

/// Per-entry delete button in the event list.
pub fn delete_named(lang: &str, name: &str) -> String {
    format!("{} {name}", t("btn_delete", lang))
}

pub fn done_mark(done: bool) -> &'static str {
    if done {
        "✅"
    } else {
        "❌"
    }
}
