//! Tests for FileSnapshotStore against a temporary directory

use tempfile::TempDir;
use tokio::fs;

use shared::{Candidate, EntryId, Performer, PerformerId, QueueEntry, Snapshot};

use crate::error::SessionError;
use crate::services::snapshot_store::FileSnapshotStore;
use crate::traits::SnapshotStore;

const KEY: &str = "karaokeNight.v1";

fn setup_store() -> (TempDir, FileSnapshotStore) {
    let dir = TempDir::new().unwrap();
    let store = FileSnapshotStore::with_base_dir(dir.path().join("state"));
    (dir, store)
}

fn sample_snapshot() -> Snapshot {
    let ana = Performer::new(PerformerId::from("player-ana"), "Ana", "Disco Diva", "ana.png");
    let bo = Performer::new(PerformerId::from("player-bo"), "Bo", "", "bo.png");
    let mut first = QueueEntry::new(
        vec![ana.id.clone(), bo.id.clone()],
        "dancing queen",
        100,
        Some(Candidate::new("vid-1", "Dancing Queen - Karaoke Version", "Sing King", Some(5_000_000))),
    );
    first.mark_played();
    let second = QueueEntry::new(vec![bo.id.clone()], "waterloo", 200, None);

    Snapshot {
        current_entry_id: Some(second.id.clone()),
        last_performer_id: Some(ana.id.clone()),
        entries: vec![first, second],
        performers: vec![ana, bo],
    }
}

#[tokio::test]
async fn test_missing_snapshot_loads_as_none() {
    let (_dir, store) = setup_store();
    assert!(store.load(KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let (_dir, store) = setup_store();
    let snapshot = sample_snapshot();

    store.save(KEY, &snapshot).await.unwrap();
    let loaded = store.load(KEY).await.unwrap().unwrap();

    assert_eq!(loaded, snapshot);
    assert!(store.snapshot_path(KEY).exists());
    assert!(!store.snapshot_path(KEY).with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let (_dir, store) = setup_store();

    store.save(KEY, &sample_snapshot()).await.unwrap();
    store.save(KEY, &Snapshot::default()).await.unwrap();

    let loaded = store.load(KEY).await.unwrap().unwrap();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_legacy_file_is_normalized_on_load() {
    let (_dir, store) = setup_store();
    fs::create_dir_all(store.base_dir()).await.unwrap();
    let legacy = r#"{
        "entries": [
            { "id": "song-1", "playerId": "player-1", "query": "mamma mia", "createdAt": 5, "status": "queued" }
        ],
        "nowPlayingId": null,
        "lastSingerId": "player-1",
        "draft": {}
    }"#;
    fs::write(store.snapshot_path(KEY), legacy).await.unwrap();

    let loaded = store.load(KEY).await.unwrap().unwrap();

    assert_eq!(loaded.entries[0].id, EntryId::from("song-1"));
    assert_eq!(loaded.entries[0].performer_ids, vec![PerformerId::from("player-1")]);
    assert_eq!(loaded.last_performer_id, Some(PerformerId::from("player-1")));
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let (_dir, store) = setup_store();
    fs::create_dir_all(store.base_dir()).await.unwrap();
    fs::write(store.snapshot_path(KEY), "{ not json").await.unwrap();

    let result = store.load(KEY).await;
    assert!(matches!(result, Err(SessionError::SharedError(_))));
}

#[tokio::test]
async fn test_clear_removes_snapshot_and_tolerates_missing() {
    let (_dir, store) = setup_store();
    store.save(KEY, &sample_snapshot()).await.unwrap();

    store.clear(KEY).await.unwrap();
    assert!(store.load(KEY).await.unwrap().is_none());

    store.clear(KEY).await.unwrap();
}

#[tokio::test]
async fn test_keys_map_to_safe_file_names() {
    let (_dir, store) = setup_store();

    let path = store.snapshot_path("../night/one");
    assert_eq!(path.parent().unwrap(), store.base_dir());
    assert_eq!(path.file_name().unwrap(), "_night_one.json");
}
