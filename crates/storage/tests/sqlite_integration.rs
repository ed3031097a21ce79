use chrono::Duration;
use quiz_core::model::HistoryEntry;
use quiz_core::time::fixed_now;
use storage::repository::{HistoryRepository, Storage};
use storage::sqlite::SqliteRepository;

fn entry(topic: &str, score: u32, minutes: i64) -> HistoryEntry {
    HistoryEntry::from_persisted(
        topic.to_string(),
        score,
        score / 20,
        5,
        fixed_now() + Duration::minutes(minutes),
        90,
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_persists_history_entry() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let original = entry("science", 60, 0);
    repo.prepend_entry(&original, 10).await.unwrap();

    let fetched = repo.list_recent(10).await.expect("list");
    assert_eq!(fetched, vec![original]);
}

#[tokio::test]
async fn sqlite_caps_history_to_newest_entries() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history_cap?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for i in 0..12_u32 {
        repo.prepend_entry(&entry(&format!("topic {i}"), 40, i64::from(i)), 10)
            .await
            .unwrap();
    }

    let fetched = repo.list_recent(100).await.unwrap();
    assert_eq!(fetched.len(), 10);
    assert_eq!(fetched.first().unwrap().topic(), "topic 11");
    assert_eq!(fetched.last().unwrap().topic(), "topic 2");

    let limited = repo.list_recent(3).await.unwrap();
    assert_eq!(limited.len(), 3);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_wires_history_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_history_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .history
        .prepend_entry(&entry("javascript", 100, 0), 10)
        .await
        .unwrap();
    assert_eq!(storage.history.list_recent(10).await.unwrap().len(), 1);
}
