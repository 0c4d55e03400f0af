//! "My day" and "My month" summaries.

use super::events::unified;
use crate::i18n::{done_mark, format_date, t};
use crate::menu::Reply;
use chrono::{Datelike, NaiveDate};
use daykeeper_store::{Birthday, Event, Store, Task};
use std::fmt::Write;

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn render_day(
    tasks: &[Task],
    birthdays: &[Birthday],
    events: &[Event],
    today: NaiveDate,
    lang: &str,
) -> Reply {
    let mut text = format!(
        "{}\n\n{}\n",
        t("my_day_header", lang),
        t("tasks_today_header", lang)
    );

    let todays: Vec<&Task> = tasks.iter().filter(|task| task.date == today).collect();
    if todays.is_empty() {
        let _ = writeln!(text, "{}", t("no_tasks_today", lang));
    }
    for (i, task) in todays.iter().enumerate() {
        let _ = writeln!(text, "{}. {} {}", i + 1, task.text, done_mark(task.done));
    }

    let _ = writeln!(text, "\n{}", t("events_today_header", lang));
    let entries: Vec<_> = unified(birthdays, events)
        .into_iter()
        .filter(|e| e.date == today)
        .collect();
    if entries.is_empty() {
        let _ = writeln!(text, "{}", t("no_events_today", lang));
    }
    for (i, entry) in entries.iter().enumerate() {
        let icon = entry.icon();
        let _ = writeln!(text, "{}. {icon} {}", i + 1, entry.label);
    }

    Reply::with_menu(text.trim_end(), lang)
}

pub fn render_month(
    tasks: &[Task],
    birthdays: &[Birthday],
    events: &[Event],
    today: NaiveDate,
    lang: &str,
) -> Reply {
    let mut text = format!(
        "{}\n\n{}\n",
        t("my_month_header", lang),
        t("tasks_month_header", lang)
    );

    let mut month_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|task| same_month(task.date, today))
        .collect();
    month_tasks.sort_by_key(|task| task.date);
    if month_tasks.is_empty() {
        let _ = writeln!(text, "{}", t("no_tasks_month", lang));
    }
    for (i, task) in month_tasks.iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {} ({}) {}",
            i + 1,
            task.text,
            format_date(task.date),
            done_mark(task.done)
        );
    }

    let _ = writeln!(text, "\n{}", t("events_month_header", lang));
    let entries: Vec<_> = unified(birthdays, events)
        .into_iter()
        .filter(|e| same_month(e.date, today))
        .collect();
    if entries.is_empty() {
        let _ = writeln!(text, "{}", t("no_events_month", lang));
    }
    for (i, entry) in entries.iter().enumerate() {
        let icon = entry.icon();
        let _ = writeln!(
            text,
            "{}. {icon} {} ({})",
            i + 1,
            entry.label,
            format_date(entry.date)
        );
    }

    Reply::with_menu(text.trim_end(), lang)
}

pub async fn my_day(store: &Store, user: &str, today: NaiveDate, lang: &str) -> Reply {
    render_day(
        &store.tasks().for_user(user).await,
        &store.birthdays().for_user(user).await,
        &store.events().for_user(user).await,
        today,
        lang,
    )
}

pub async fn my_month(store: &Store, user: &str, today: NaiveDate, lang: &str) -> Reply {
    render_month(
        &store.tasks().for_user(user).await,
        &store.birthdays().for_user(user).await,
        &store.events().for_user(user).await,
        today,
        lang,
    )
}
