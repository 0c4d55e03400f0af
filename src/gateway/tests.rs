use super::scheduler::{next_occurrence, sweep_reminders, ResetSummary, SweepSummary};
use super::*;
use crate::i18n::t;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use daykeeper_core::message::{IncomingKind, Keyboard};
use daykeeper_store::{Birthday, Reminder, ReminderKind, Task};
use std::sync::Mutex as StdMutex;

const RU: &str = "Russian";
const USER: &str = "42";

/// Channel double that records everything the gateway emits.
#[derive(Default)]
struct RecordingChannel {
    sent: StdMutex<Vec<OutgoingMessage>>,
    documents: StdMutex<Vec<(String, String, usize)>>,
    answered: StdMutex<Vec<String>>,
    failing_target: Option<String>,
}

impl RecordingChannel {
    fn failing_for(target: &str) -> Self {
        Self {
            failing_target: Some(target.to_string()),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn take(&self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start(
        &self,
    ) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, DaykeeperError> {
        let (_tx, rx) = tokio::sync::mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), DaykeeperError> {
        if message.reply_target.is_some() && message.reply_target == self.failing_target {
            return Err(DaykeeperError::Channel("chat not found".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn send_document(
        &self,
        target: &str,
        payload: Vec<u8>,
        filename: &str,
    ) -> Result<(), DaykeeperError> {
        self.documents
            .lock()
            .unwrap()
            .push((target.to_string(), filename.to_string(), payload.len()));
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), DaykeeperError> {
        self.answered.lock().unwrap().push(query_id.to_string());
        Ok(())
    }

    async fn stop(&self) -> Result<(), DaykeeperError> {
        Ok(())
    }
}

fn open_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("data")).unwrap();
    (dir, store)
}

fn gateway_with(
    channel: Arc<RecordingChannel>,
    store: Store,
    reading_dir: &std::path::Path,
) -> Gateway {
    let mut config = Config::default();
    config.reading.dir = reading_dir.to_string_lossy().into_owned();
    Gateway::new(channel, store, &config).unwrap()
}

fn incoming(kind: IncomingKind) -> IncomingMessage {
    IncomingMessage {
        id: uuid::Uuid::new_v4(),
        channel: "recording".to_string(),
        sender_id: USER.to_string(),
        sender_name: None,
        kind,
        timestamp: chrono::Utc::now(),
        reply_target: Some(USER.to_string()),
    }
}

fn text(s: &str) -> IncomingMessage {
    incoming(IncomingKind::Text {
        text: s.to_string(),
    })
}

fn press(data: &str, message_id: i64) -> IncomingMessage {
    incoming(IncomingKind::Callback {
        data: data.to_string(),
        query_id: "q1".to_string(),
        message_id: Some(message_id),
    })
}

fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hh, mm, 0)
        .unwrap()
}

fn hm(h: u8, m: u8) -> HourMinute {
    HourMinute::new(h, m).unwrap()
}

async fn seed_reminder(store: &Store, user: &str, reminder: Reminder) {
    store
        .reminders()
        .mutate_user(user, |v| v.push(reminder))
        .await
        .unwrap();
}

// --- reminder sweep ---

#[tokio::test]
async fn test_today_reminder_fires_once_and_is_removed() {
    let (_dir, store) = open_store();
    let channel = RecordingChannel::default();
    seed_reminder(&store, USER, Reminder::new("call mom", hm(9, 5), ReminderKind::Today, None)).await;

    let now = at(2025, 9, 26, 9, 5);
    let summary = sweep_reminders(&store, &channel, now, RU).await;
    assert_eq!(
        summary,
        SweepSummary {
            fired: 1,
            delivered: 1,
            failed: 0
        }
    );
    let sent = channel.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "🔔 Напоминание: call mom");
    assert_eq!(sent[0].reply_target.as_deref(), Some(USER));
    assert!(store.reminders().for_user(USER).await.is_empty());

    let again = sweep_reminders(&store, &channel, now, RU).await;
    assert_eq!(again.fired, 0);
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn test_daily_reminder_fires_once_per_day() {
    let (_dir, store) = open_store();
    let channel = RecordingChannel::default();
    seed_reminder(&store, USER, Reminder::new("water", hm(8, 0), ReminderKind::Daily, None)).await;

    let now = at(2025, 9, 26, 8, 0);
    assert_eq!(sweep_reminders(&store, &channel, now, RU).await.fired, 1);
    assert_eq!(sweep_reminders(&store, &channel, now, RU).await.fired, 0);

    let kept = store.reminders().for_user(USER).await;
    assert_eq!(kept.len(), 1);
    assert!(kept[0].fired_today);

    let reset = reset_day(&store, now.date()).await;
    assert_eq!(reset.reminders_reset, 1);

    let tomorrow = at(2025, 9, 27, 8, 0);
    assert_eq!(sweep_reminders(&store, &channel, tomorrow, RU).await.fired, 1);
    assert_eq!(channel.sent().len(), 2);
}

#[tokio::test]
async fn test_other_day_reminder_fires_only_on_its_date() {
    let (_dir, store) = open_store();
    let channel = RecordingChannel::default();
    let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    seed_reminder(
        &store,
        USER,
        Reminder::new("dentist", hm(14, 30), ReminderKind::OtherDay, Some(date)),
    )
    .await;

    let wrong_day = at(2025, 9, 30, 14, 30);
    assert_eq!(sweep_reminders(&store, &channel, wrong_day, RU).await.fired, 0);

    let wrong_minute = at(2025, 10, 1, 14, 31);
    assert_eq!(sweep_reminders(&store, &channel, wrong_minute, RU).await.fired, 0);

    let right = at(2025, 10, 1, 14, 30);
    assert_eq!(sweep_reminders(&store, &channel, right, RU).await.fired, 1);
    assert!(store.reminders().for_user(USER).await[0].fired_today);
}

#[tokio::test]
async fn test_paused_reminder_does_not_fire() {
    let (_dir, store) = open_store();
    let channel = RecordingChannel::default();
    let mut reminder = Reminder::new("stretch", hm(10, 0), ReminderKind::Daily, None);
    reminder.enabled = false;
    seed_reminder(&store, USER, reminder).await;

    let summary = sweep_reminders(&store, &channel, at(2025, 9, 26, 10, 0), RU).await;
    assert_eq!(summary, SweepSummary::default());
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn test_failed_delivery_does_not_block_other_users() {
    let (_dir, store) = open_store();
    let channel = RecordingChannel::failing_for("7");
    seed_reminder(&store, "7", Reminder::new("a", hm(9, 0), ReminderKind::Daily, None)).await;
    seed_reminder(&store, USER, Reminder::new("b", hm(9, 0), ReminderKind::Daily, None)).await;

    let summary = sweep_reminders(&store, &channel, at(2025, 9, 26, 9, 0), RU).await;
    assert_eq!(
        summary,
        SweepSummary {
            fired: 2,
            delivered: 1,
            failed: 1
        }
    );
    assert_eq!(channel.sent()[0].reply_target.as_deref(), Some(USER));
    // Marked even though delivery failed; no retry this minute.
    assert!(store.reminders().for_user("7").await[0].fired_today);
}

#[tokio::test]
async fn test_sweep_state_survives_reopen() {
    let (dir, store) = open_store();
    let channel = RecordingChannel::default();
    seed_reminder(&store, USER, Reminder::new("x", hm(9, 0), ReminderKind::Daily, None)).await;
    sweep_reminders(&store, &channel, at(2025, 9, 26, 9, 0), RU).await;

    let reopened = Store::open(dir.path().join("data")).unwrap();
    assert!(reopened.reminders().for_user(USER).await[0].fired_today);
}

// --- daily reset ---

#[tokio::test]
async fn test_reset_archives_and_clears() {
    let (_dir, store) = open_store();
    let day = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
    let mut done = Task::new("b", day);
    done.done = true;
    store
        .tasks()
        .mutate(|all| {
            all.insert(USER.to_string(), vec![Task::new("a", day), done.clone()]);
            all.insert("7".to_string(), vec![Task::new("c", day)]);
            all.insert("8".to_string(), Vec::new());
        })
        .await
        .unwrap();

    let mut fired = Reminder::new("d", hm(9, 0), ReminderKind::Daily, None);
    fired.fired_today = true;
    seed_reminder(&store, USER, fired).await;
    let mut other = Reminder::new("o", hm(9, 0), ReminderKind::OtherDay, Some(day));
    other.fired_today = true;
    seed_reminder(&store, "7", other).await;

    let summary = reset_day(&store, day).await;
    assert_eq!(
        summary,
        ResetSummary {
            archived_users: 2,
            archived_tasks: 3,
            reminders_reset: 2
        }
    );

    assert!(store.tasks().all().await.values().all(Vec::is_empty));
    let history = store.history().for_user(USER).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, day);
    assert_eq!(history[0].tasks, vec![Task::new("a", day), done]);
    assert!(store.history().for_user("8").await.is_empty());

    let reminders = store.reminders().all().await;
    assert!(reminders.values().flatten().all(|r| !r.fired_today));
}

#[tokio::test]
async fn test_reset_twice_appends_history() {
    let (_dir, store) = open_store();
    let day = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
    for d in [day, day.succ_opt().unwrap()] {
        store
            .tasks()
            .mutate_user(USER, |v| v.push(Task::new("t", d)))
            .await
            .unwrap();
        reset_day(&store, d).await;
    }
    let history = store.history().for_user(USER).await;
    assert_eq!(history.len(), 2);
    assert!(history[0].date < history[1].date);

    let empty = reset_day(&store, day).await;
    assert_eq!(empty.archived_users, 0);
    assert_eq!(store.history().for_user(USER).await.len(), 2);
}

#[test]
fn test_next_occurrence() {
    let now = at(2025, 9, 26, 12, 0);
    assert_eq!(next_occurrence(now, hm(23, 55)), at(2025, 9, 26, 23, 55));
    assert_eq!(next_occurrence(now, hm(12, 0)), at(2025, 9, 27, 12, 0));
    assert_eq!(next_occurrence(now, hm(0, 0)), at(2025, 9, 27, 0, 0));
    assert_eq!(
        next_occurrence(at(2025, 12, 31, 23, 59), hm(23, 55)),
        at(2026, 1, 1, 23, 55)
    );
}

// --- routing ---

#[tokio::test]
async fn test_start_shows_welcome_and_menu() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, dir.path());

    gw.handle_message(text("/start@daykeeper_bot")).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, t("welcome", RU));
    assert!(matches!(sent[0].keyboard, Some(Keyboard::Menu { .. })));
}

#[test]
fn test_command_parse() {
    use super::routing::Command;
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(Command::parse("/help@bot extra"), Some(Command::Help));
    assert_eq!(Command::parse("/nope"), None);
    assert_eq!(Command::parse(""), None);
}

#[tokio::test]
async fn test_task_scenario_through_gateway() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store.clone(), dir.path());

    gw.handle_message(text(t("menu_add_task", RU))).await;
    gw.handle_message(text(t("choice_today", RU))).await;
    gw.handle_message(text("buy milk")).await;
    let sent = channel.take();
    assert_eq!(sent.last().unwrap().text, "✅ Задача добавлена: buy milk");

    gw.handle_message(text(t("menu_tasks", RU))).await;
    let list = channel.take();
    assert!(list[0].text.contains("1. buy milk ❌"));
    assert!(matches!(list[0].keyboard, Some(Keyboard::Inline { .. })));

    gw.handle_message(press("v1:task:today:done:0", 77)).await;
    let edited = channel.take();
    assert_eq!(edited.len(), 1);
    assert_eq!(edited[0].edit_message_id, Some(77));
    assert!(edited[0].text.contains("1. buy milk ✅"));
    assert_eq!(channel.answered.lock().unwrap().as_slice(), ["q1"]);

    let tasks = store.tasks().for_user(USER).await;
    assert!(tasks[0].done);
    assert_eq!(tasks[0].date, Local::now().date_naive());

    // Deleting the last task degrades the list: edit plus a fresh menu.
    gw.handle_message(press("v1:task:today:del:0", 77)).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].edit_message_id, Some(77));
    assert!(sent[0].keyboard.is_none());
    assert_eq!(sent[1].text, t("back_to_menu", RU));
    assert!(matches!(sent[1].keyboard, Some(Keyboard::Menu { .. })));
    assert!(store.tasks().for_user(USER).await.is_empty());
}

#[tokio::test]
async fn test_garbage_callback_is_rejected() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store.clone(), dir.path());

    gw.handle_message(press("del_b0", 5)).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, t("back_to_menu", RU));
    assert_eq!(sent[0].edit_message_id, None);
    assert_eq!(channel.answered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_label_mid_flow_discards_session() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store.clone(), dir.path());

    gw.handle_message(text(t("menu_birthday", RU))).await;
    assert!(gw.conversations.is_active(USER).await);
    gw.handle_message(text(t("menu_tasks", RU))).await;
    assert!(!gw.conversations.is_active(USER).await);

    // The name the flow was waiting for is now just unknown text.
    channel.take();
    gw.handle_message(text("Anna")).await;
    assert_eq!(channel.take()[0].text, t("unknown_input", RU));
    assert!(store.birthdays().for_user(USER).await.is_empty());
}

#[tokio::test]
async fn test_button_press_discards_session() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, dir.path());

    gw.handle_message(text(t("menu_add_reminder", RU))).await;
    assert!(gw.conversations.is_active(USER).await);
    gw.handle_message(press("v1:ev:del:b0", 3)).await;
    assert!(!gw.conversations.is_active(USER).await);
}

#[tokio::test]
async fn test_cancel_outside_flow_returns_menu() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, dir.path());

    gw.handle_message(text(t("cancel", RU))).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 1);
    assert!(matches!(sent[0].keyboard, Some(Keyboard::Menu { .. })));
}

#[tokio::test]
async fn test_cancel_command_with_bot_name_mid_flow() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, dir.path());

    gw.handle_message(text(t("menu_add_task", RU))).await;
    channel.take();

    gw.handle_message(text("/cancel@daykeeper_bot")).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, t("cancelled", RU));
    assert!(!gw.conversations.is_active(USER).await);
}

#[tokio::test]
async fn test_unknown_text_and_command() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, dir.path());

    gw.handle_message(text("hello there")).await;
    gw.handle_message(text("/frobnicate")).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.text == t("unknown_input", RU)));
}

#[tokio::test]
async fn test_events_submenu() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, dir.path());

    gw.handle_message(text(t("menu_events", RU))).await;
    let sent = channel.take();
    assert_eq!(sent[0].text, t("events_menu", RU));
    assert_eq!(sent[0].keyboard, Some(crate::menu::events_menu(RU)));
}

#[tokio::test]
async fn test_stale_event_delete_rerenders_without_change() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store.clone(), dir.path());
    let date = NaiveDate::from_ymd_opt(1990, 5, 12).unwrap();
    store
        .birthdays()
        .mutate_user(USER, |v| {
            v.push(Birthday {
                name: "Anna".into(),
                date,
            })
        })
        .await
        .unwrap();

    gw.handle_message(press("v1:ev:del:b9", 11)).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].edit_message_id, Some(11));
    assert!(sent[0].text.contains("Anna"));
    assert_eq!(store.birthdays().for_user(USER).await.len(), 1);

    gw.handle_message(press("v1:ev:del:b0", 11)).await;
    let sent = channel.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].text, t("no_events", RU));
    assert_eq!(sent[1].text, t("back_to_menu", RU));
    assert!(store.birthdays().for_user(USER).await.is_empty());
}

#[tokio::test]
async fn test_read_with_missing_dir() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, &dir.path().join("pdfs"));

    gw.handle_message(text(t("menu_read", RU))).await;
    let sent = channel.take();
    assert_eq!(sent[0].text, t("reading_dir_missing", RU));
    assert!(channel.documents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_read_sends_document() {
    let (dir, store) = open_store();
    let pdfs = dir.path().join("pdfs");
    std::fs::create_dir(&pdfs).unwrap();
    std::fs::write(pdfs.join("essay.pdf"), b"%PDF-1.4").unwrap();

    let channel = Arc::new(RecordingChannel::default());
    let gw = gateway_with(channel.clone(), store, &pdfs);

    gw.handle_message(text(t("menu_read", RU))).await;
    assert!(channel.sent().is_empty());
    let docs = channel.documents.lock().unwrap().clone();
    assert_eq!(
        docs,
        vec![(USER.to_string(), "essay.pdf".to_string(), 8)]
    );
}

#[tokio::test]
async fn test_dispatch_preserves_order_per_sender() {
    let (dir, store) = open_store();
    let channel = Arc::new(RecordingChannel::default());
    let gw = Arc::new(gateway_with(channel.clone(), store.clone(), dir.path()));

    gw.clone().dispatch_message(text(t("menu_add_task", RU))).await;
    gw.clone().dispatch_message(text(t("choice_today", RU))).await;
    gw.clone().dispatch_message(text("read a book")).await;

    assert_eq!(store.tasks().for_user(USER).await[0].text, "read a book");
    assert!(gw.active_senders.lock().await.is_empty());
}

#[test]
fn test_invalid_reset_time_is_config_error() {
    let (_dir, store) = open_store();
    let mut config = Config::default();
    config.scheduler.reset_time = "25:00".into();
    let result = Gateway::new(Arc::new(RecordingChannel::default()), store, &config);
    assert!(matches!(result, Err(DaykeeperError::Config(_))));
}
