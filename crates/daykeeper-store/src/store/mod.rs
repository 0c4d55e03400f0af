//! Snapshot-backed store.
//!
//! Each collection lives in memory behind its own async mutex and is
//! rewritten in full to its JSON snapshot after every mutation. When a
//! write fails the in-memory state is kept and served; the error is logged
//! and returned to the caller.
//!
//! Operations that hold more than one collection lock take them in this
//! order: tasks, reminders, birthdays, events, history.

mod snapshot;

#[cfg(test)]
mod tests;

use crate::model::{Birthday, Event, HistoryEntry, Reminder, Task, UserMap};
use daykeeper_core::error::DaykeeperError;
use serde::{de::DeserializeOwned, Serialize};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info};

const TASKS_FILE: &str = "tasks.json";
const REMINDERS_FILE: &str = "reminders.json";
const BIRTHDAYS_FILE: &str = "birthdays.json";
const EVENTS_FILE: &str = "events.json";
const HISTORY_FILE: &str = "tasks_history.json";

/// The five per-user collections.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Collections>,
}

struct Collections {
    tasks: SharedCollection<Task>,
    reminders: SharedCollection<Reminder>,
    birthdays: SharedCollection<Birthday>,
    events: SharedCollection<Event>,
    history: SharedCollection<HistoryEntry>,
}

/// Record counts across all users, for status output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub tasks: usize,
    pub reminders: usize,
    pub birthdays: usize,
    pub events: usize,
    pub history_entries: usize,
}

impl Store {
    /// Open the store in `dir`, creating it if needed and loading every snapshot.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, DaykeeperError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            DaykeeperError::Store(format!("failed to create {}: {e}", dir.display()))
        })?;

        let inner = Collections {
            tasks: SharedCollection::load("tasks", dir.join(TASKS_FILE))?,
            reminders: SharedCollection::load("reminders", dir.join(REMINDERS_FILE))?,
            birthdays: SharedCollection::load("birthdays", dir.join(BIRTHDAYS_FILE))?,
            events: SharedCollection::load("events", dir.join(EVENTS_FILE))?,
            history: SharedCollection::load("tasks_history", dir.join(HISTORY_FILE))?,
        };

        info!("Store opened at {}", dir.display());
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn tasks(&self) -> &SharedCollection<Task> {
        &self.inner.tasks
    }

    pub fn reminders(&self) -> &SharedCollection<Reminder> {
        &self.inner.reminders
    }

    pub fn birthdays(&self) -> &SharedCollection<Birthday> {
        &self.inner.birthdays
    }

    pub fn events(&self) -> &SharedCollection<Event> {
        &self.inner.events
    }

    pub fn history(&self) -> &SharedCollection<HistoryEntry> {
        &self.inner.history
    }

    pub async fn counts(&self) -> StoreCounts {
        let tasks = self.tasks().all().await;
        let reminders = self.reminders().all().await;
        let birthdays = self.birthdays().all().await;
        let events = self.events().all().await;
        let history = self.history().all().await;

        let mut users: Vec<&String> = tasks
            .keys()
            .chain(reminders.keys())
            .chain(birthdays.keys())
            .chain(events.keys())
            .chain(history.keys())
            .collect();
        users.sort();
        users.dedup();

        StoreCounts {
            users: users.len(),
            tasks: tasks.values().map(Vec::len).sum(),
            reminders: reminders.values().map(Vec::len).sum(),
            birthdays: birthdays.values().map(Vec::len).sum(),
            events: events.values().map(Vec::len).sum(),
            history_entries: history.values().map(Vec::len).sum(),
        }
    }
}

/// One collection: in-memory map plus the snapshot file it mirrors.
pub struct SharedCollection<T> {
    name: &'static str,
    path: PathBuf,
    data: Mutex<UserMap<T>>,
}

impl<T> SharedCollection<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    fn load(name: &'static str, path: PathBuf) -> Result<Self, DaykeeperError> {
        let data = snapshot::read_snapshot(&path)?;
        Ok(Self {
            name,
            path,
            data: Mutex::new(data),
        })
    }

    /// Copy of one user's records, in insertion order.
    pub async fn for_user(&self, user: &str) -> Vec<T> {
        self.data.lock().await.get(user).cloned().unwrap_or_default()
    }

    /// Copy of every user's records.
    pub async fn all(&self) -> UserMap<T> {
        self.data.lock().await.clone()
    }

    /// Apply `f` to the whole map, then persist the snapshot.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut UserMap<T>) -> R) -> Result<R, DaykeeperError> {
        let mut guard = self.lock().await;
        let result = f(&mut *guard);
        guard.persist().await?;
        Ok(result)
    }

    /// Apply `f` to one user's records, creating the entry if missing.
    pub async fn mutate_user<R>(
        &self,
        user: &str,
        f: impl FnOnce(&mut Vec<T>) -> R,
    ) -> Result<R, DaykeeperError> {
        self.mutate(|map| f(map.entry(user.to_string()).or_default()))
            .await
    }

    /// Hold the collection for a multi-step operation.
    pub async fn lock(&self) -> CollectionGuard<'_, T> {
        CollectionGuard {
            name: self.name,
            path: &self.path,
            data: self.data.lock().await,
        }
    }
}

/// Exclusive access to a collection; derefs to the user map.
pub struct CollectionGuard<'a, T> {
    name: &'static str,
    path: &'a Path,
    data: MutexGuard<'a, UserMap<T>>,
}

impl<T: Serialize> CollectionGuard<'_, T> {
    /// Rewrite the snapshot from the current in-memory state.
    ///
    /// The state is serialized under the lock and written on the blocking
    /// pool. The lock stays held until the write lands, so snapshots of one
    /// collection never reach the disk out of order.
    pub async fn persist(&self) -> Result<(), DaykeeperError> {
        let result = match serde_json::to_string_pretty(&*self.data) {
            Ok(json) => {
                let path = self.path.to_path_buf();
                tokio::task::spawn_blocking(move || snapshot::write_json(&path, &json))
                    .await
                    .unwrap_or_else(|e| {
                        Err(DaykeeperError::Store(format!("snapshot writer failed: {e}")))
                    })
            }
            Err(e) => Err(e.into()),
        };
        result.map_err(|e| {
            error!("failed to persist {} (serving from memory): {e}", self.name);
            e
        })
    }
}

impl<T> Deref for CollectionGuard<'_, T> {
    type Target = UserMap<T>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for CollectionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
