//! Time-driven jobs: the reminder sweep and the daily archive-and-reset.
//!
//! Neither job catches up on missed ticks. A trigger that passes while the
//! process is down is skipped.

use super::Gateway;
use crate::i18n;
use chrono::{Local, NaiveDate, NaiveDateTime};
use daykeeper_core::{config::SchedulerConfig, message::OutgoingMessage, traits::Channel};
use daykeeper_store::{HistoryEntry, HourMinute, ReminderKind, Store};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// What one sweep did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub fired: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// What one daily reset did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResetSummary {
    pub archived_users: usize,
    pub archived_tasks: usize,
    pub reminders_reset: usize,
}

/// Fire every reminder due at `now`.
///
/// Fired reminders are marked (or removed, for one-off reminders) and
/// persisted before anything is sent, so a reminder never goes out twice in
/// the same minute. A failed delivery is logged and not retried.
pub async fn sweep_reminders(
    store: &Store,
    channel: &dyn Channel,
    now: NaiveDateTime,
    lang: &str,
) -> SweepSummary {
    let due: Vec<(String, String)> = {
        let mut reminders = store.reminders().lock().await;
        let mut due = Vec::new();
        for (user, list) in reminders.iter_mut() {
            list.retain_mut(|r| {
                if !r.is_due(now) {
                    return true;
                }
                due.push((user.clone(), r.text.clone()));
                if r.kind == ReminderKind::Today {
                    false
                } else {
                    r.fired_today = true;
                    true
                }
            });
        }
        if !due.is_empty() {
            if let Err(e) = reminders.persist().await {
                warn!("reminder sweep: fired state kept in memory only: {e}");
            }
        }
        due
    };

    let mut summary = SweepSummary {
        fired: due.len(),
        ..Default::default()
    };
    for (user, text) in due {
        let msg = OutgoingMessage::new(i18n::reminder_notification(lang, &text), Some(user.clone()));
        match channel.send(msg).await {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                summary.failed += 1;
                warn!("{user}: reminder delivery failed: {e}");
            }
        }
    }
    summary
}

/// Archive every user's tasks under `today`, clear all tasks, and clear
/// `fired_today` on every reminder.
pub async fn reset_day(store: &Store, today: NaiveDate) -> ResetSummary {
    let mut summary = ResetSummary::default();

    {
        let mut tasks = store.tasks().lock().await;
        let mut history = store.history().lock().await;
        for (user, list) in tasks.iter() {
            if list.is_empty() {
                continue;
            }
            history.entry(user.clone()).or_default().push(HistoryEntry {
                date: today,
                tasks: list.clone(),
            });
            summary.archived_users += 1;
            summary.archived_tasks += list.len();
        }
        if let Err(e) = history.persist().await {
            warn!("daily reset: task history kept in memory only: {e}");
        }
        drop(history);

        tasks.clear();
        if let Err(e) = tasks.persist().await {
            warn!("daily reset: cleared task list kept in memory only: {e}");
        }
    }

    let mut reminders = store.reminders().lock().await;
    for r in reminders.values_mut().flatten() {
        if r.fired_today {
            r.fired_today = false;
            summary.reminders_reset += 1;
        }
    }
    if let Err(e) = reminders.persist().await {
        warn!("daily reset: reminder flags kept in memory only: {e}");
    }

    summary
}

/// First time strictly after `now` at which the wall clock reads `at`.
pub fn next_occurrence(now: NaiveDateTime, at: HourMinute) -> NaiveDateTime {
    let today_at = now.date().and_time(at.to_naive_time());
    if today_at > now {
        today_at
    } else {
        today_at + chrono::Duration::days(1)
    }
}

impl Gateway {
    /// Background task: run the reminder sweep at a fixed interval.
    pub(super) async fn sweep_loop(
        store: Store,
        channel: Arc<dyn Channel>,
        config: SchedulerConfig,
        lang: String,
    ) {
        let start =
            tokio::time::Instant::now() + Duration::from_secs(config.first_sweep_delay_secs);
        let period = Duration::from_secs(config.sweep_interval_secs.max(1));
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let now = Local::now().naive_local();
            let summary = sweep_reminders(&store, channel.as_ref(), now, &lang).await;
            if summary.fired > 0 {
                info!(
                    "reminder sweep at {}: fired {}, delivered {}, failed {}",
                    HourMinute::of(now.time()),
                    summary.fired,
                    summary.delivered,
                    summary.failed
                );
            }
        }
    }

    /// Background task: archive and reset once a day at `at`, local time.
    pub(super) async fn reset_loop(store: Store, at: HourMinute) {
        loop {
            let now = Local::now().naive_local();
            let next = next_occurrence(now, at);
            info!("daily reset scheduled for {next}");
            tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

            let summary = reset_day(&store, next.date()).await;
            info!(
                "daily reset for {}: archived {} tasks of {} users, cleared {} reminder flags",
                next.date(),
                summary.archived_tasks,
                summary.archived_users,
                summary.reminders_reset
            );
        }
    }
}
