//! Session state owned by the playback controller
//!
//! Pure data plus lookups and snapshot conversion. All transitions live in
//! the controller; this module never changes playback state on its own.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use shared::{component_debug, component_warn, ComponentId, EntryId, Performer, PerformerId, QueueEntry, Snapshot};

use crate::error::{SessionError, SessionResult};

/// Where the controller stands in the playback lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    /// No current entry
    Idle,
    /// Current entry bound and live
    Playing,
    /// Previous entry ended on its own; the next one is chosen but not started
    AwaitingNext,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::AwaitingNext => write!(f, "awaiting next"),
        }
    }
}

/// Queue, roster and playback fields of one karaoke session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub(crate) entries: Vec<QueueEntry>,
    pub(crate) performers: Vec<Performer>,
    pub(crate) current_entry_id: Option<EntryId>,
    pub(crate) last_performer_id: Option<PerformerId>,
    pub(crate) forced_next_id: Option<EntryId>,
    pub(crate) awaiting_confirm: bool,
    /// Bumped on reset and restore so late song requests can be recognised
    pub(crate) epoch: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn performers(&self) -> &[Performer] {
        &self.performers
    }

    pub fn current_entry_id(&self) -> Option<&EntryId> {
        self.current_entry_id.as_ref()
    }

    pub fn last_performer_id(&self) -> Option<&PerformerId> {
        self.last_performer_id.as_ref()
    }

    pub fn forced_next_id(&self) -> Option<&EntryId> {
        self.forced_next_id.as_ref()
    }

    pub fn is_awaiting_confirm(&self) -> bool {
        self.awaiting_confirm
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn playback_state(&self) -> PlaybackState {
        match (&self.current_entry_id, self.awaiting_confirm) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::AwaitingNext,
            (Some(_), false) => PlaybackState::Playing,
        }
    }

    pub fn entry(&self, id: &EntryId) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub(crate) fn entry_mut(&mut self, id: &EntryId) -> Option<&mut QueueEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    pub fn is_queued(&self, id: &EntryId) -> bool {
        self.entry(id).is_some_and(QueueEntry::is_queued)
    }

    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.current_entry_id.as_ref().and_then(|id| self.entry(id))
    }

    pub fn performer(&self, id: &PerformerId) -> Option<&Performer> {
        self.performers.iter().find(|p| &p.id == id)
    }

    pub fn is_known_performer(&self, id: &PerformerId) -> bool {
        self.performer(id).is_some()
    }

    /// Performers of an entry, in the entry's order, skipping unknown ids
    pub fn performers_of<'a>(&'a self, entry: &'a QueueEntry) -> Vec<&'a Performer> {
        entry.performer_ids.iter().filter_map(|id| self.performer(id)).collect()
    }

    /// Queued entries ordered by creation time, ties in insertion order
    pub fn queued(&self) -> Vec<&QueueEntry> {
        let mut queued: Vec<&QueueEntry> = self.entries.iter().filter(|e| e.is_queued()).collect();
        queued.sort_by_key(|e| e.created_at);
        queued
    }

    pub fn queued_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_queued()).count()
    }

    /// Resolve a performer by id, by display name (case-insensitive) or by 1-based roster position
    pub fn find_performer(&self, reference: &str) -> Option<&Performer> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        self.performers
            .iter()
            .find(|p| p.id.as_str() == reference)
            .or_else(|| {
                self.performers
                    .iter()
                    .find(|p| p.display_name.eq_ignore_ascii_case(reference))
            })
            .or_else(|| {
                let position: usize = reference.parse().ok()?;
                self.performers.get(position.checked_sub(1)?)
            })
    }

    /// Resolve an entry by id or by 1-based position in the queued list
    pub fn find_entry(&self, reference: &str) -> Option<&QueueEntry> {
        let reference = reference.trim();
        if let Some(entry) = self.entries.iter().find(|e| e.id.as_str() == reference) {
            return Some(entry);
        }

        let position: usize = reference.parse().ok()?;
        self.queued().get(position.checked_sub(1)?).copied()
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self.entries.clone(),
            current_entry_id: self.current_entry_id.clone(),
            last_performer_id: self.last_performer_id.clone(),
            performers: self.performers.clone(),
        }
    }

    /// Rebuild state from a stored snapshot
    ///
    /// Entries without performers are dropped, unknown performer ids get a
    /// placeholder roster entry, and a current id that no longer names a
    /// queued entry is cleared. The forced-next pin and confirmation flag are
    /// never persisted, so both start cleared.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let Snapshot {
            entries,
            current_entry_id,
            last_performer_id,
            mut performers,
        } = snapshot;

        let mut seen_performers: HashSet<PerformerId> = HashSet::new();
        performers.retain(|p| seen_performers.insert(p.id.clone()));

        let mut kept = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if entry.performer_ids.is_empty() {
                component_warn!(
                    ComponentId::Session,
                    "Dropping stored entry {} ('{}') with no performers",
                    entry.id,
                    entry.query
                );
                continue;
            }

            let mut unique = HashSet::new();
            entry.performer_ids.retain(|id| unique.insert(id.clone()));

            for id in &entry.performer_ids {
                if seen_performers.insert(id.clone()) {
                    component_debug!(ComponentId::Session, "Adding placeholder performer for {}", id);
                    performers.push(Performer::placeholder(id.clone()));
                }
            }
            kept.push(entry);
        }

        let mut state = Self {
            entries: kept,
            performers,
            current_entry_id: None,
            last_performer_id,
            forced_next_id: None,
            awaiting_confirm: false,
            epoch: 0,
        };

        if let Some(id) = current_entry_id {
            if state.is_queued(&id) {
                state.current_entry_id = Some(id);
            } else {
                component_warn!(ComponentId::Session, "Clearing stale current entry {}", id);
            }
        }

        state
    }

    /// Verify the session invariants, naming the first one that is broken
    pub fn check_invariants(&self) -> SessionResult<()> {
        for entry in &self.entries {
            if entry.performer_ids.is_empty() {
                return Err(SessionError::validation(format!("entry {} has no performers", entry.id)));
            }
            if let Some(unknown) = entry.performer_ids.iter().find(|id| !self.is_known_performer(id)) {
                return Err(SessionError::validation(format!(
                    "entry {} references unknown performer {}",
                    entry.id, unknown
                )));
            }
        }

        if let Some(forced) = &self.forced_next_id {
            if !self.is_queued(forced) {
                return Err(SessionError::validation(format!("forced entry {forced} is not queued")));
            }
        }

        if self.awaiting_confirm {
            match &self.current_entry_id {
                Some(id) if self.is_queued(id) => {}
                _ => {
                    return Err(SessionError::validation(
                        "awaiting confirmation without a queued current entry",
                    ))
                }
            }
        }

        Ok(())
    }
}
