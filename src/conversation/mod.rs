//! Conversation engine: one active multi-step flow per user.
//!
//! Sessions live in memory only. They are created when a flow starts and
//! removed on commit, cancel, or any out-of-flow action.

mod flow;


pub use flow::{Flow, Record, Session, Step};

use crate::i18n::t;
use crate::menu::Reply;
use chrono::NaiveDate;
use daykeeper_core::error::DaykeeperError;
use daykeeper_store::Store;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Active sessions keyed by user id.
#[derive(Default)]
pub struct Conversations {
    sessions: Mutex<HashMap<String, Session>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin `flow` for `user`, replacing any flow already in progress.
    pub async fn start(&self, user: &str, flow: Flow, lang: &str) -> Reply {
        let session = flow.initial();
        let reply = session.prompt(lang);
        if let Some(previous) = self
            .sessions
            .lock()
            .await
            .insert(user.to_string(), session)
        {
            info!(
                "{user}: replacing active {:?} flow with {flow:?}",
                previous.flow()
            );
        }
        reply
    }

    #[cfg(test)]
    pub async fn is_active(&self, user: &str) -> bool {
        self.sessions.lock().await.contains_key(user)
    }

    /// Current session, if any.
    #[cfg(test)]
    pub async fn session(&self, user: &str) -> Option<Session> {
        self.sessions.lock().await.get(user).cloned()
    }

    /// Drop the user's session without persisting anything.
    pub async fn discard(&self, user: &str) -> bool {
        let removed = self.sessions.lock().await.remove(user);
        if let Some(ref s) = removed {
            debug!("{user}: discarded {:?} flow", s.flow());
        }
        removed.is_some()
    }

    /// Handle the reserved cancel token, in or out of a flow.
    pub async fn cancel(&self, user: &str, lang: &str) -> Reply {
        if self.discard(user).await {
            info!("{user}: flow cancelled");
        }
        Reply::with_menu(t("cancelled", lang), lang)
    }

    /// Feed free text into the user's active flow.
    ///
    /// Returns `None` when the user has no flow in progress.
    pub async fn handle(
        &self,
        store: &Store,
        user: &str,
        input: &str,
        today: NaiveDate,
        lang: &str,
    ) -> Option<Reply> {
        let session = self.sessions.lock().await.remove(user)?;

        let reply = match session.advance(input, today, lang) {
            Step::Next(next) => {
                let reply = next.prompt(lang);
                self.sessions.lock().await.insert(user.to_string(), next);
                reply
            }
            Step::Retry(e) => {
                debug!("{user}: rejected input for {:?} flow: {e}", session.flow());
                let prompt = session.prompt(lang);
                self.sessions.lock().await.insert(user.to_string(), session);
                Reply::new(e.message(lang), prompt.keyboard)
            }
            Step::Commit(record) => {
                let text = record.confirmation(lang);
                match commit(store, user, record).await {
                    Ok(()) => {
                        info!("{user}: {:?} flow committed", session.flow());
                        Reply::with_menu(text, lang)
                    }
                    Err(e) => {
                        error!("{user}: {:?} flow commit failed: {e}", session.flow());
                        Reply::with_menu(t("save_failed", lang), lang)
                    }
                }
            }
        };
        Some(reply)
    }
}

/// Append a finished record to its collection.
pub async fn commit(store: &Store, user: &str, record: Record) -> Result<(), DaykeeperError> {
    match record {
        Record::Task(task) => store.tasks().mutate_user(user, |v| v.push(task)).await,
        Record::Reminder(r) => store.reminders().mutate_user(user, |v| v.push(r)).await,
        Record::Birthday(b) => store.birthdays().mutate_user(user, |v| v.push(b)).await,
        Record::Event(e) => store.events().mutate_user(user, |v| v.push(e)).await,
    }
}
