use super::*;
use crate::model::{HourMinute, ReminderKind};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_open_empty_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path().join("data")).unwrap();
    assert!(store.tasks().for_user("1").await.is_empty());
    assert_eq!(store.counts().await, StoreCounts::default());
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();

    let mut done = Task::new("pay rent", date(2026, 3, 1));
    done.done = true;
    store
        .tasks()
        .mutate_user("1", |tasks| {
            tasks.push(Task::new("buy milk", date(2026, 3, 1)));
            tasks.push(done.clone());
        })
        .await
        .unwrap();

    let reminder = Reminder::new(
        "call mom",
        HourMinute::new(18, 5).unwrap(),
        ReminderKind::OtherDay,
        Some(date(2026, 3, 2)),
    );
    store
        .reminders()
        .mutate_user("1", |r| r.push(reminder.clone()))
        .await
        .unwrap();
    store
        .birthdays()
        .mutate_user("2", |b| {
            b.push(Birthday {
                name: "Anna".into(),
                date: date(2026, 7, 14),
            })
        })
        .await
        .unwrap();
    store
        .events()
        .mutate_user("2", |e| {
            e.push(Event {
                title: "Concert".into(),
                date: date(2026, 4, 4),
            })
        })
        .await
        .unwrap();
    store
        .history()
        .mutate_user("1", |h| {
            h.push(HistoryEntry {
                date: date(2026, 2, 28),
                tasks: vec![done.clone()],
            })
        })
        .await
        .unwrap();

    let reopened = Store::open(tmp.path()).unwrap();
    assert_eq!(reopened.tasks().all().await, store.tasks().all().await);
    assert_eq!(reopened.reminders().for_user("1").await, vec![reminder]);
    assert_eq!(reopened.birthdays().all().await, store.birthdays().all().await);
    assert_eq!(reopened.events().all().await, store.events().all().await);
    assert_eq!(reopened.history().all().await, store.history().all().await);

    let counts = reopened.counts().await;
    assert_eq!(counts.users, 2);
    assert_eq!(counts.tasks, 2);
    assert_eq!(counts.history_entries, 1);
}

#[tokio::test]
async fn test_snapshot_format_uses_iso_dates() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    store
        .tasks()
        .mutate_user("7", |t| t.push(Task::new("x", date(2026, 12, 31))))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    assert!(raw.contains("\"2026-12-31\""), "raw snapshot: {raw}");
    assert!(raw.contains("\"7\""));
}

#[tokio::test]
async fn test_persist_leaves_no_temp_file() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    store
        .events()
        .mutate_user("1", |e| {
            e.push(Event {
                title: "x".into(),
                date: date(2026, 1, 1),
            })
        })
        .await
        .unwrap();

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(names.contains(&"events.json".to_string()));
    assert!(!names.iter().any(|n| n.ends_with(".tmp")), "{names:?}");
}

#[tokio::test]
async fn test_corrupt_snapshot_moved_aside() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("tasks.json"), "{ not json").unwrap();

    let store = Store::open(tmp.path()).unwrap();
    assert!(store.tasks().all().await.is_empty());
    assert!(tmp.path().join("tasks.json.corrupt").exists());
    assert!(!tmp.path().join("tasks.json").exists());
}

#[tokio::test]
async fn test_failed_persist_keeps_memory_state() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("data");
    let store = Store::open(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    let result = store
        .tasks()
        .mutate_user("1", |t| t.push(Task::new("kept", date(2026, 1, 1))))
        .await;
    assert!(matches!(result, Err(DaykeeperError::Store(_))));
    assert_eq!(store.tasks().for_user("1").await.len(), 1);
}

#[tokio::test]
async fn test_lock_guard_multi_step() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    {
        let mut guard = store.tasks().lock().await;
        guard
            .entry("1".into())
            .or_default()
            .push(Task::new("a", date(2026, 1, 1)));
        guard.persist().await.unwrap();
        guard.clear();
        guard.persist().await.unwrap();
    }
    let reopened = Store::open(tmp.path()).unwrap();
    assert!(reopened.tasks().all().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_writers_land_every_record() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::open(tmp.path()).unwrap();

    let writers: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .tasks()
                    .mutate_user("1", |t| t.push(Task::new(format!("t{i}"), date(2026, 1, 1))))
                    .await
                    .unwrap();
            })
        })
        .collect();
    for w in writers {
        w.await.unwrap();
    }

    let reopened = Store::open(tmp.path()).unwrap();
    assert_eq!(reopened.tasks().for_user("1").await.len(), 20);
    assert!(!tmp.path().join("tasks.json.tmp").exists());
}
