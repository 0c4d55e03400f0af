//! Unified, date-sorted view of birthdays and events.

use super::button;
use crate::callback::{Callback, EventRef};
use crate::i18n::{delete_named, format_date, t};
use crate::menu::Reply;
use chrono::NaiveDate;
use daykeeper_core::{error::DaykeeperError, message::Keyboard};
use daykeeper_store::{Birthday, Event, Store};
use tracing::debug;

/// One line of the unified view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EventRef,
    pub label: String,
    pub date: NaiveDate,
}

impl Entry {
    pub fn icon(&self) -> &'static str {
        match self.id {
            EventRef::Birthday(_) => "🎂",
            EventRef::Event(_) => "📌",
        }
    }
}

/// Merge both collections and sort by date; ties keep birthdays first.
pub fn unified(birthdays: &[Birthday], events: &[Event]) -> Vec<Entry> {
    let mut entries: Vec<Entry> = birthdays
        .iter()
        .enumerate()
        .map(|(i, b)| Entry {
            id: EventRef::Birthday(i),
            label: b.name.clone(),
            date: b.date,
        })
        .chain(events.iter().enumerate().map(|(i, e)| Entry {
            id: EventRef::Event(i),
            label: e.title.clone(),
            date: e.date,
        }))
        .collect();
    entries.sort_by_key(|e| e.date);
    entries
}

pub fn render(entries: &[Entry], today: NaiveDate, lang: &str) -> Reply {
    if entries.is_empty() {
        return Reply::with_menu(t("no_events", lang), lang);
    }

    let mut lines = Vec::with_capacity(entries.len());
    let mut rows = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let mut line = format!(
            "{}. {} {} - {}",
            i + 1,
            entry.icon(),
            entry.label,
            format_date(entry.date)
        );
        if entry.date == today {
            line.push(' ');
            line.push_str(t("today_note", lang));
        }
        lines.push(line);
        rows.push(vec![button(
            delete_named(lang, &entry.label),
            &Callback::DeleteEvent(entry.id),
        )]);
    }

    Reply::new(lines.join("\n"), Some(Keyboard::Inline { rows }))
}

pub async fn show(store: &Store, user: &str, today: NaiveDate, lang: &str) -> Reply {
    let birthdays = store.birthdays().for_user(user).await;
    let events = store.events().for_user(user).await;
    render(&unified(&birthdays, &events), today, lang)
}

/// Remove the referenced record if its index is still in range.
pub async fn delete(store: &Store, user: &str, target: EventRef) -> Result<bool, DaykeeperError> {
    match target {
        EventRef::Birthday(index) => remove_at(store.birthdays(), user, index).await,
        EventRef::Event(index) => remove_at(store.events(), user, index).await,
    }
}

async fn remove_at<T>(
    collection: &daykeeper_store::SharedCollection<T>,
    user: &str,
    index: usize,
) -> Result<bool, DaykeeperError>
where
    T: Clone + serde::Serialize + serde::de::DeserializeOwned,
{
    let mut guard = collection.lock().await;
    match guard.get_mut(user) {
        Some(list) if index < list.len() => {
            list.remove(index);
        }
        _ => {
            debug!("{user}: event index {index} out of range");
            return Ok(false);
        }
    }
    guard.persist().await?;
    Ok(true)
}
