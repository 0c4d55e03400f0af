//! Reminder list.
//!
//! Numbering is per bucket and for display only; buttons address
//! reminders by id.

use super::button;
use crate::callback::{Bucket, Callback, ReminderAction};
use crate::i18n::{done_mark, format_date, t};
use crate::menu::Reply;
use daykeeper_core::{error::DaykeeperError, message::Keyboard};
use daykeeper_store::{Reminder, ReminderKind, Store};
use std::fmt::Write;
use tracing::debug;
use uuid::Uuid;

pub fn bucket_of(reminder: &Reminder) -> Bucket {
    match reminder.kind {
        ReminderKind::Today | ReminderKind::Daily => Bucket::Today,
        ReminderKind::OtherDay => Bucket::Other,
    }
}

pub fn render(reminders: &[Reminder], lang: &str) -> Reply {
    let mut text = format!("{}\n", t("reminders_header", lang));
    let mut rows = Vec::new();

    for (bucket, header, empty) in [
        (Bucket::Today, "reminders_today_header", "no_reminders_today"),
        (Bucket::Other, "reminders_other_header", "no_reminders_other"),
    ] {
        let _ = writeln!(text, "\n{}", t(header, lang));
        let in_bucket: Vec<&Reminder> = reminders
            .iter()
            .filter(|r| bucket_of(r) == bucket)
            .collect();
        if in_bucket.is_empty() {
            let _ = writeln!(text, "{}", t(empty, lang));
        }

        for (i, r) in in_bucket.into_iter().enumerate() {
            let n = i + 1;
            let mark = done_mark(r.fired_today);
            let when = match (r.kind, r.date) {
                (ReminderKind::Daily, _) => format!("{} {}", r.time, t("daily_note", lang)),
                (ReminderKind::OtherDay, Some(date)) => {
                    format!("{}, {}", format_date(date), r.time)
                }
                _ => r.time.to_string(),
            };
            let paused = if r.enabled {
                String::new()
            } else {
                format!(" [{}]", t("paused_note", lang))
            };
            let _ = writeln!(text, "{n}. {} ({when}){paused} {mark}", r.text);

            let mut row = Vec::new();
            if r.kind == ReminderKind::Daily {
                let (action, label) = if r.enabled {
                    (ReminderAction::Stop, "btn_stop")
                } else {
                    (ReminderAction::Start, "btn_resume")
                };
                row.push(button(
                    format!("{n}. {}", t(label, lang)),
                    &Callback::Reminder { action, id: r.id },
                ));
            }
            row.push(button(
                format!("{n}. {}", t("btn_delete", lang)),
                &Callback::Reminder {
                    action: ReminderAction::Delete,
                    id: r.id,
                },
            ));
            rows.push(row);
        }
    }

    let text = text.trim_end().to_string();
    if rows.is_empty() {
        Reply::with_menu(text, lang)
    } else {
        Reply::new(text, Some(Keyboard::Inline { rows }))
    }
}

pub async fn show(store: &Store, user: &str, lang: &str) -> Reply {
    render(&store.reminders().for_user(user).await, lang)
}

/// Apply a reminder button press. Returns whether anything changed.
///
/// Pausing and resuming only apply to daily reminders.
pub async fn apply(
    store: &Store,
    user: &str,
    action: ReminderAction,
    id: Uuid,
) -> Result<bool, DaykeeperError> {
    let mut guard = store.reminders().lock().await;
    let Some(list) = guard.get_mut(user) else {
        return Ok(false);
    };
    let Some(pos) = list.iter().position(|r| r.id == id) else {
        debug!("{user}: reminder {id} no longer exists");
        return Ok(false);
    };

    let changed = match action {
        ReminderAction::Delete => {
            list.remove(pos);
            true
        }
        ReminderAction::Stop | ReminderAction::Start => {
            let enable = action == ReminderAction::Start;
            let r = &mut list[pos];
            if r.kind == ReminderKind::Daily && r.enabled != enable {
                r.enabled = enable;
                true
            } else {
                false
            }
        }
    };
    if changed {
        guard.persist().await?;
    }
    Ok(changed)
}
