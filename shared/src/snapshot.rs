//! Persisted representation of a karaoke session

use serde::{Deserialize, Serialize};

use crate::errors::{SharedError, SharedResult};
use crate::types::{EntryId, Performer, PerformerId, QueueEntry};

/// Full snapshot written on every save; loads also accept the legacy field names
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub entries: Vec<QueueEntry>,
    #[serde(default, alias = "nowPlayingId")]
    pub current_entry_id: Option<EntryId>,
    #[serde(default, alias = "lastSingerId")]
    pub last_performer_id: Option<PerformerId>,
    #[serde(default, alias = "playersAlt")]
    pub performers: Vec<Performer>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.performers.is_empty()
    }

    pub fn to_json(&self) -> SharedResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SharedError::SerializationError {
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> SharedResult<Self> {
        serde_json::from_str(json).map_err(|e| SharedError::DeserializationError {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;

    #[test]
    fn test_json_round_trip() {
        let ana = Performer::new(PerformerId::from("p1"), "Ana", "The Voice", "avatar-1.png");
        let mut entry = QueueEntry::new(
            vec![ana.id.clone()],
            "dancing queen",
            42,
            Some(Candidate::new("abc", "Dancing Queen - Karaoke Version", "Sing King", Some(10))),
        );
        entry.mark_played();

        let snapshot = Snapshot {
            current_entry_id: Some(entry.id.clone()),
            last_performer_id: Some(ana.id.clone()),
            entries: vec![entry],
            performers: vec![ana],
        };

        let restored = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_legacy_snapshot_loads() {
        let json = r#"{
            "entries": [
                { "id": "song-1", "playerId": "player-1", "query": "waterloo", "createdAt": 1, "status": "played" },
                { "id": "song-2", "playerIds": ["player-2"], "query": "fernando", "createdAt": 2, "status": "queued" }
            ],
            "nowPlayingId": "song-2",
            "lastSingerId": "player-1",
            "draft": {},
            "playersAlt": [
                { "id": "player-1", "name": "Ana", "nickname": "Guest Star", "photoUrl": "a.png" }
            ]
        }"#;

        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[0].performer_ids, vec![PerformerId::from("player-1")]);
        assert_eq!(snapshot.current_entry_id, Some(EntryId::from("song-2")));
        assert_eq!(snapshot.last_performer_id, Some(PerformerId::from("player-1")));
        assert_eq!(snapshot.performers[0].display_name, "Ana");
        assert_eq!(snapshot.performers[0].avatar_ref, "a.png");
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.current_entry_id.is_none());
    }

    #[test]
    fn test_garbage_is_a_deserialization_error() {
        let result = Snapshot::from_json("not json");
        assert!(matches!(result, Err(SharedError::DeserializationError { .. })));
    }
}
