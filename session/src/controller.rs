//! Playback controller
//!
//! Owns the session state and drives every transition between `Idle`,
//! `Playing` and `AwaitingNext`. Performer and entry choice is delegated to
//! the rotation scheduler and entry selector; a queued forced-next pin always
//! takes precedence over both. State changes are published on a broadcast
//! channel for whatever surface renders the session.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::broadcast;

use shared::{
    component_debug, component_info, component_warn, now_millis, Candidate, ComponentId, EntryId, Performer,
    PerformerId, QueueEntry, Snapshot,
};

use crate::core::{select_entry, select_performer, PlaybackState, SessionState};
use crate::error::{SessionError, SessionResult};

/// Shortest accepted song query, after trimming
pub const MIN_QUERY_CHARS: usize = 2;

const EVENT_CAPACITY: usize = 64;

/// Notification of a state change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    PerformerJoined { performer_id: PerformerId },
    EntryAdded { entry_id: EntryId, performer_ids: Vec<PerformerId> },
    EntryRemoved { entry_id: EntryId },
    ForcedNextSet { entry_id: EntryId },
    /// The pin was dropped because its entry was removed or is no longer queued
    ForcedNextCleared { entry_id: EntryId },
    NowPlaying { entry_id: EntryId },
    /// Next entry chosen after the previous one ended; waiting for confirmation
    UpNext { entry_id: EntryId },
    Idle,
    Reset,
    Restored { entries: usize },
    /// A song search finished after a reset or restore and was dropped
    RequestDiscarded { query: String },
}

/// A validated song request waiting for its search to finish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRequest {
    pub performer_ids: Vec<PerformerId>,
    pub query: String,
    /// Session epoch when the request was made
    pub epoch: u64,
}

/// Current entry with its performers, for display
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub entry: QueueEntry,
    pub performers: Vec<Performer>,
    pub state: PlaybackState,
    /// Queued entries, the current one included
    pub remaining: usize,
}

enum Resolution {
    Forced(EntryId),
    Rotated(EntryId),
}

impl Resolution {
    fn entry_id(&self) -> &EntryId {
        match self {
            Resolution::Forced(id) | Resolution::Rotated(id) => id,
        }
    }
}

/// Single-writer controller for one karaoke session
pub struct PlaybackController<R = StdRng>
where
    R: Rng,
{
    state: SessionState,
    rng: R,
    events: broadcast::Sender<SessionEvent>,
}

impl PlaybackController<StdRng> {
    /// Controller with an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Controller whose rotation is reproducible for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for PlaybackController<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PlaybackController<R>
where
    R: Rng,
{
    pub fn with_rng(rng: R) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: SessionState::new(),
            rng,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.state.playback_state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.to_snapshot()
    }

    /// Replace the session with a stored snapshot
    ///
    /// Requests begun before the restore are discarded when they complete.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let epoch = self.state.epoch + 1;
        self.state = SessionState::from_snapshot(snapshot);
        self.state.epoch = epoch;

        let entries = self.state.entries.len();
        component_info!(
            ComponentId::Session,
            "📂 Restored {} entries and {} performers",
            entries,
            self.state.performers.len()
        );
        self.emit(SessionEvent::Restored { entries });
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        let entry = self.state.current_entry()?;
        Some(NowPlaying {
            entry: entry.clone(),
            performers: self.state.performers_of(entry).into_iter().cloned().collect(),
            state: self.state.playback_state(),
            remaining: self.state.queued_count(),
        })
    }

    /// Register a new performer in the roster
    pub fn register_performer(
        &mut self,
        display_name: &str,
        nickname: &str,
        avatar_ref: &str,
    ) -> SessionResult<PerformerId> {
        let performer = Performer::new(PerformerId::new(), display_name, nickname, avatar_ref);
        let id = performer.id.clone();
        self.add_performer(performer)?;
        Ok(id)
    }

    /// Add a performer with a caller-chosen id
    pub fn add_performer(&mut self, performer: Performer) -> SessionResult<()> {
        if performer.display_name.trim().is_empty() {
            return Err(SessionError::validation("performer name must not be empty"));
        }
        if self.state.is_known_performer(&performer.id) {
            return Err(SessionError::validation(format!(
                "performer {} is already registered",
                performer.id
            )));
        }

        component_debug!(
            ComponentId::Session,
            "Registered performer {} ({})",
            performer.display_name,
            performer.id
        );
        let performer_id = performer.id.clone();
        self.state.performers.push(performer);
        self.emit(SessionEvent::PerformerJoined { performer_id });
        Ok(())
    }

    /// Validate a song request and tag it with the current epoch
    ///
    /// The search itself happens outside the controller; hand the result to
    /// [`complete_request`](Self::complete_request).
    pub fn begin_request(&self, performer_ids: &[PerformerId], query: &str) -> SessionResult<SongRequest> {
        let performer_ids = self.validate_request(performer_ids, query)?;
        Ok(SongRequest {
            performer_ids,
            query: query.trim().to_string(),
            epoch: self.state.epoch,
        })
    }

    /// Append the entry for a finished request, or drop it if the session was
    /// reset or restored since the request began
    pub fn complete_request(&mut self, request: SongRequest, candidate: Candidate) -> SessionResult<Option<EntryId>> {
        if request.epoch != self.state.epoch {
            component_warn!(
                ComponentId::Session,
                "Discarding late result for '{}' (epoch {} != {})",
                request.query,
                request.epoch,
                self.state.epoch
            );
            self.emit(SessionEvent::RequestDiscarded { query: request.query });
            return Ok(None);
        }

        self.add_entry(&request.performer_ids, &request.query, candidate).map(Some)
    }

    /// Append a queued entry created now; never changes playback state
    pub fn add_entry(
        &mut self,
        performer_ids: &[PerformerId],
        query: &str,
        candidate: Candidate,
    ) -> SessionResult<EntryId> {
        let performer_ids = self.validate_request(performer_ids, query)?;
        let entry = QueueEntry::new(performer_ids, query.trim(), now_millis(), Some(candidate));
        let entry_id = entry.id.clone();

        component_info!(
            ComponentId::Session,
            "➕ Queued '{}' for {}",
            entry.query,
            self.names(&entry.performer_ids)
        );
        let performer_ids = entry.performer_ids.clone();
        self.state.entries.push(entry);
        self.emit(SessionEvent::EntryAdded {
            entry_id: entry_id.clone(),
            performer_ids,
        });
        Ok(entry_id)
    }

    /// Delete an entry, returning it if it existed
    pub fn remove_entry(&mut self, id: &EntryId) -> Option<QueueEntry> {
        let position = self.state.entries.iter().position(|e| &e.id == id)?;
        let removed = self.state.entries.remove(position);
        component_debug!(ComponentId::Session, "Removed entry {} ('{}')", removed.id, removed.query);
        self.emit(SessionEvent::EntryRemoved { entry_id: id.clone() });

        if self.state.forced_next_id.as_ref() == Some(id) {
            self.state.forced_next_id = None;
            self.emit(SessionEvent::ForcedNextCleared { entry_id: id.clone() });
        }

        if self.state.current_entry_id.as_ref() == Some(id) {
            self.state.current_entry_id = None;
            self.state.awaiting_confirm = false;
            self.emit(SessionEvent::Idle);
        }

        Some(removed)
    }

    /// Pin a queued entry as the next one to play
    ///
    /// Returns `false` without changing anything when `id` is not queued.
    pub fn set_forced_next(&mut self, id: &EntryId) -> bool {
        if !self.state.is_queued(id) {
            component_debug!(ComponentId::Session, "Ignoring force request for non-queued entry {}", id);
            return false;
        }

        self.state.forced_next_id = Some(id.clone());
        self.emit(SessionEvent::ForcedNextSet { entry_id: id.clone() });

        if self.state.playback_state() == PlaybackState::AwaitingNext {
            self.state.current_entry_id = Some(id.clone());
            self.emit(SessionEvent::UpNext { entry_id: id.clone() });
        }
        true
    }

    /// Explicit "next": confirm a pre-chosen entry, or skip to a new one
    pub fn advance(&mut self) -> PlaybackState {
        if self.state.awaiting_confirm {
            if let Some(id) = self.state.current_entry_id.clone() {
                self.state.last_performer_id = self.state.entry(&id).and_then(|e| e.lead_performer()).cloned();
                self.state.awaiting_confirm = false;
                component_info!(ComponentId::Session, "▶️ Starting {}", self.describe(&id));
                self.emit(SessionEvent::NowPlaying { entry_id: id });
                return PlaybackState::Playing;
            }
        }

        self.finish_current();
        match self.resolve_next() {
            Some(resolution) => {
                let id = resolution.entry_id().clone();
                self.state.last_performer_id = self.state.entry(&id).and_then(|e| e.lead_performer()).cloned();
                self.state.current_entry_id = Some(id.clone());
                self.state.forced_next_id = None;
                self.state.awaiting_confirm = false;
                component_info!(ComponentId::Session, "▶️ Now playing {}", self.describe(&id));
                self.emit(SessionEvent::NowPlaying { entry_id: id });
            }
            None => self.go_idle(),
        }
        self.state.playback_state()
    }

    /// The playback surface reports the current track has finished
    ///
    /// Never starts playback; the next entry waits for [`advance`](Self::advance).
    pub fn media_ended(&mut self) -> PlaybackState {
        self.finish_current();
        match self.resolve_next() {
            Some(resolution) => {
                let id = resolution.entry_id().clone();
                self.state.current_entry_id = Some(id.clone());
                self.state.forced_next_id = None;
                self.state.awaiting_confirm = true;
                component_info!(ComponentId::Session, "⏭️ Up next {}", self.describe(&id));
                self.emit(SessionEvent::UpNext { entry_id: id });
            }
            None => self.go_idle(),
        }
        self.state.playback_state()
    }

    /// Clear the queue and playback fields; the roster is kept
    pub fn reset(&mut self) {
        let epoch = self.state.epoch + 1;
        self.state.entries.clear();
        self.state.current_entry_id = None;
        self.state.last_performer_id = None;
        self.state.forced_next_id = None;
        self.state.awaiting_confirm = false;
        self.state.epoch = epoch;

        component_info!(ComponentId::Session, "🧹 Session reset (epoch {})", epoch);
        self.emit(SessionEvent::Reset);
    }

    fn finish_current(&mut self) {
        let Some(id) = self.state.current_entry_id.clone() else {
            return;
        };
        if let Some(entry) = self.state.entry_mut(&id) {
            entry.mark_played();
        }
    }

    fn go_idle(&mut self) {
        self.state.current_entry_id = None;
        self.state.awaiting_confirm = false;
        component_info!(ComponentId::Session, "⏹️ Queue exhausted");
        self.emit(SessionEvent::Idle);
    }

    /// Forced pin first, then rotation and FIFO selection
    fn resolve_next(&mut self) -> Option<Resolution> {
        if let Some(forced) = self.state.forced_next_id.clone() {
            if self.state.is_queued(&forced) {
                return Some(Resolution::Forced(forced));
            }
            component_debug!(ComponentId::Session, "Dropping stale forced entry {}", forced);
            self.state.forced_next_id = None;
            self.emit(SessionEvent::ForcedNextCleared { entry_id: forced });
        }

        let performer_id = select_performer(
            &self.state.entries,
            self.state.last_performer_id.as_ref(),
            &mut self.rng,
        )?;
        let entry = select_entry(&self.state.entries, &performer_id)?;
        Some(Resolution::Rotated(entry.id.clone()))
    }

    fn validate_request(&self, performer_ids: &[PerformerId], query: &str) -> SessionResult<Vec<PerformerId>> {
        let mut seen = HashSet::new();
        let unique: Vec<PerformerId> = performer_ids
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        if unique.is_empty() {
            return Err(SessionError::validation("pick at least one performer"));
        }
        if let Some(unknown) = unique.iter().find(|id| !self.state.is_known_performer(id)) {
            return Err(SessionError::validation(format!("unknown performer {unknown}")));
        }
        if query.trim().chars().count() < MIN_QUERY_CHARS {
            return Err(SessionError::validation(format!(
                "song query must be at least {MIN_QUERY_CHARS} characters"
            )));
        }

        Ok(unique)
    }

    fn names(&self, performer_ids: &[PerformerId]) -> String {
        performer_ids
            .iter()
            .map(|id| {
                self.state
                    .performer(id)
                    .map(|p| p.display_name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect::<Vec<_>>()
            .join(" & ")
    }

    fn describe(&self, id: &EntryId) -> String {
        match self.state.entry(id) {
            Some(entry) => format!("'{}' by {}", entry.query, self.names(&entry.performer_ids)),
            None => id.to_string(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
