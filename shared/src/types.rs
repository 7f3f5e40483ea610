//! Core shared types and identifiers

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Nickname given to performers registered without one
pub const DEFAULT_NICKNAME: &str = "Guest Star";

/// Milliseconds since the Unix epoch, the unit of `QueueEntry::created_at`
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn short_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &simple[..8])
}

/// Unique identifier for a performer in the roster
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformerId(String);

impl PerformerId {
    pub fn new() -> Self {
        Self(short_id("player"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PerformerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for PerformerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PerformerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PerformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a queue entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new() -> Self {
        Self(short_id("song"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person eligible to be selected to sing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    pub id: PerformerId,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default, alias = "photoUrl")]
    pub avatar_ref: String,
}

impl Performer {
    /// Build a performer, trimming names and defaulting a blank nickname
    pub fn new(id: PerformerId, display_name: &str, nickname: &str, avatar_ref: &str) -> Self {
        let nickname = nickname.trim();
        Self {
            id,
            display_name: display_name.trim().to_string(),
            nickname: if nickname.is_empty() {
                DEFAULT_NICKNAME.to_string()
            } else {
                nickname.to_string()
            },
            avatar_ref: avatar_ref.to_string(),
        }
    }

    /// Stand-in for an id referenced by a snapshot entry but absent from its roster
    pub fn placeholder(id: PerformerId) -> Self {
        let name = id.to_string();
        Self::new(id, &name, "", "")
    }
}

/// A search result for a song query, scored once ranked
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(alias = "videoId")]
    pub external_id: String,
    pub title: String,
    #[serde(alias = "channelTitle")]
    pub channel_name: String,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub score: f64,
}

impl Candidate {
    /// Unscored candidate as returned by a search collaborator
    pub fn new(external_id: &str, title: &str, channel_name: &str, view_count: Option<u64>) -> Self {
        Self {
            external_id: external_id.to_string(),
            title: title.to_string(),
            channel_name: channel_name.to_string(),
            view_count,
            score: 0.0,
        }
    }
}

/// Lifecycle status of a queue entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Queued,
    Played,
}

/// One requested song tied to one or more performers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "QueueEntryRecord")]
pub struct QueueEntry {
    pub id: EntryId,
    pub performer_ids: Vec<PerformerId>,
    pub query: String,
    pub created_at: i64,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_candidate: Option<Candidate>,
}

impl QueueEntry {
    pub fn new(
        performer_ids: Vec<PerformerId>,
        query: &str,
        created_at: i64,
        selected_candidate: Option<Candidate>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            performer_ids,
            query: query.to_string(),
            created_at,
            status: EntryStatus::Queued,
            selected_candidate,
        }
    }

    pub fn is_queued(&self) -> bool {
        self.status == EntryStatus::Queued
    }

    pub fn includes(&self, performer_id: &PerformerId) -> bool {
        self.performer_ids.contains(performer_id)
    }

    /// First listed performer; the one recorded as having sung last
    pub fn lead_performer(&self) -> Option<&PerformerId> {
        self.performer_ids.first()
    }

    /// External id to hand to the playback surface
    pub fn external_id(&self) -> Option<&str> {
        self.selected_candidate.as_ref().map(|c| c.external_id.as_str())
    }

    /// Transition `queued -> played`; there is no way back
    pub fn mark_played(&mut self) {
        self.status = EntryStatus::Played;
    }
}

/// Wire shape of a queue entry, accepting the legacy single-performer field
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueEntryRecord {
    id: EntryId,
    #[serde(default, alias = "playerIds")]
    performer_ids: Option<Vec<PerformerId>>,
    #[serde(default, alias = "playerId")]
    performer_id: Option<PerformerId>,
    #[serde(default)]
    query: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    status: EntryStatus,
    #[serde(default, alias = "youtube")]
    selected_candidate: Option<Candidate>,
}

impl From<QueueEntryRecord> for QueueEntry {
    fn from(record: QueueEntryRecord) -> Self {
        let performer_ids = match (record.performer_ids, record.performer_id) {
            (Some(ids), _) => ids,
            (None, Some(legacy)) => vec![legacy],
            (None, None) => Vec::new(),
        };

        Self {
            id: record.id,
            performer_ids,
            query: record.query,
            created_at: record.created_at,
            status: record.status,
            selected_candidate: record.selected_candidate,
        }
    }
}
