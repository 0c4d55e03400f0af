//! Task list: today vs other days.

use super::button;
use crate::callback::{Bucket, Callback, TaskAction};
use crate::i18n::{done_mark, format_date, t};
use crate::menu::Reply;
use chrono::NaiveDate;
use daykeeper_core::{error::DaykeeperError, message::Keyboard};
use daykeeper_store::{Store, Task};
use std::fmt::Write;
use tracing::debug;

/// Positions in `tasks` for the today and other buckets, in sequence order.
pub fn partition(tasks: &[Task], today: NaiveDate) -> [Vec<usize>; 2] {
    let mut buckets = [Vec::new(), Vec::new()];
    for (pos, task) in tasks.iter().enumerate() {
        let bucket = if task.date == today {
            Bucket::Today
        } else {
            Bucket::Other
        };
        buckets[bucket.slot()].push(pos);
    }
    buckets
}

pub fn render(tasks: &[Task], today: NaiveDate, lang: &str) -> Reply {
    let [today_ix, other_ix] = partition(tasks, today);
    let mut text = String::new();
    let mut rows = Vec::new();

    for (bucket, positions, header, empty) in [
        (Bucket::Today, &today_ix, "tasks_today_header", "no_tasks_today"),
        (Bucket::Other, &other_ix, "tasks_other_header", "no_tasks_other"),
    ] {
        if !text.is_empty() {
            text.push('\n');
        }
        let _ = writeln!(text, "{}", t(header, lang));
        if positions.is_empty() {
            let _ = writeln!(text, "{}", t(empty, lang));
        }
        for (index, &pos) in positions.iter().enumerate() {
            let task = &tasks[pos];
            let n = index + 1;
            let mark = done_mark(task.done);
            match bucket {
                Bucket::Today => {
                    let _ = writeln!(text, "{n}. {} {mark}", task.text);
                }
                Bucket::Other => {
                    let _ = writeln!(text, "{n}. {} ({}) {mark}", task.text, format_date(task.date));
                }
            }

            let delete = Callback::Task {
                bucket,
                action: TaskAction::Delete,
                index,
            };
            let delete = button(format!("{n}. {}", t("btn_delete", lang)), &delete);
            if task.done {
                rows.push(vec![delete]);
            } else {
                let done = Callback::Task {
                    bucket,
                    action: TaskAction::Done,
                    index,
                };
                rows.push(vec![
                    button(format!("{n}. {}", t("btn_done", lang)), &done),
                    delete,
                ]);
            }
        }
    }

    let text = text.trim_end().to_string();
    if rows.is_empty() {
        Reply::with_menu(text, lang)
    } else {
        Reply::new(text, Some(Keyboard::Inline { rows }))
    }
}

pub async fn show(store: &Store, user: &str, today: NaiveDate, lang: &str) -> Reply {
    render(&store.tasks().for_user(user).await, today, lang)
}

/// Apply a task button press. Returns whether anything changed.
pub async fn apply(
    store: &Store,
    user: &str,
    bucket: Bucket,
    action: TaskAction,
    index: usize,
    today: NaiveDate,
) -> Result<bool, DaykeeperError> {
    let mut guard = store.tasks().lock().await;
    let Some(list) = guard.get_mut(user) else {
        return Ok(false);
    };
    let Some(&pos) = partition(list, today)[bucket.slot()].get(index) else {
        debug!("{user}: task {bucket:?}/{index} no longer exists");
        return Ok(false);
    };

    let changed = match action {
        TaskAction::Done if list[pos].done => false,
        TaskAction::Done => {
            list[pos].done = true;
            true
        }
        TaskAction::Delete => {
            list.remove(pos);
            true
        }
    };
    if changed {
        guard.persist().await?;
    }
    Ok(changed)
}
