//! Test fixtures and data for session tests

#![allow(dead_code)]

use shared::{Candidate, Performer, PerformerId, QueueEntry, Snapshot};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const ANA: &'static str = "player-ana";
    pub const BO: &'static str = "player-bo";
    pub const CY: &'static str = "player-cy";

    pub const STATE_KEY: &'static str = "karaokeNight.v1";
    pub const SEED: u64 = 7;

    pub fn ana() -> PerformerId {
        PerformerId::from(Self::ANA)
    }

    pub fn bo() -> PerformerId {
        PerformerId::from(Self::BO)
    }

    pub fn cy() -> PerformerId {
        PerformerId::from(Self::CY)
    }

    /// Ana, Bo and Cy with avatars
    pub fn performers() -> Vec<Performer> {
        vec![
            Performer::new(Self::ana(), "Ana", "Disco Diva", "ana.png"),
            Performer::new(Self::bo(), "Bo", "", "bo.png"),
            Performer::new(Self::cy(), "Cy", "Crooner", "cy.png"),
        ]
    }

    pub fn candidate(external_id: &str) -> Candidate {
        Candidate::new(external_id, "Song - Karaoke Version", "Sing King", Some(1_000))
    }

    /// Raw search results for "dancing queen"; the karaoke upload must win
    pub fn dancing_queen_results() -> Vec<Candidate> {
        vec![
            Candidate::new("live", "Dancing Queen (Live)", "Random Channel", Some(50_000)),
            Candidate::new("karaoke", "Dancing Queen - Karaoke Version", "Sing King", Some(5_000_000)),
        ]
    }

    pub fn queued_entry(performers: &[PerformerId], query: &str, created_at: i64) -> QueueEntry {
        QueueEntry::new(performers.to_vec(), query, created_at, Some(Self::candidate(query)))
    }

    /// Snapshot where Ana has two songs left, Bo one, and Ana sang last
    pub fn ana_sang_last() -> Snapshot {
        Snapshot {
            entries: vec![
                Self::queued_entry(&[Self::ana()], "waterloo", 10),
                Self::queued_entry(&[Self::ana()], "mamma mia", 20),
                Self::queued_entry(&[Self::bo()], "fernando", 30),
            ],
            current_entry_id: None,
            last_performer_id: Some(Self::ana()),
            performers: Self::performers(),
        }
    }

    /// Snapshot using the legacy field names (playerIds, nowPlayingId, playersAlt, youtube)
    pub const LEGACY_SNAPSHOT: &'static str = r#"{
        "entries": [
            { "id": "song-1", "playerId": "player-ana", "query": "waterloo", "createdAt": 1, "status": "played" },
            {
                "id": "song-2",
                "playerIds": ["player-bo", "player-ghost"],
                "query": "fernando",
                "createdAt": 2,
                "status": "queued",
                "youtube": { "videoId": "abc", "title": "Fernando (Karaoke Version)", "channelTitle": "Sing King" }
            }
        ],
        "nowPlayingId": "song-2",
        "lastSingerId": "player-ana",
        "draft": {},
        "playersAlt": [
            { "id": "player-ana", "name": "Ana", "nickname": "Disco Diva", "photoUrl": "ana.png" },
            { "id": "player-bo", "name": "Bo", "nickname": "Guest Star", "photoUrl": "bo.png" }
        ]
    }"#;
}
