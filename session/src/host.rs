//! Session host
//!
//! Drives a playback controller from terminal commands. Song searches run as
//! spawned tasks and report back over an mpsc channel, so the queue stays
//! usable while a search is pending. The snapshot is saved after every change;
//! persistence failures are logged and otherwise ignored.

use std::fmt::Write as _;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc;

use finder::{FinderResult, KaraokeFinder, VideoSearch};
use shared::{component_debug, component_info, component_warn, Candidate, ComponentId, EntryId, PerformerId};

use crate::command::{Command, HELP};
use crate::controller::{PlaybackController, SongRequest};
use crate::core::PlaybackState;
use crate::error::{SessionError, SessionResult};
use crate::traits::SnapshotStore;

/// Default storage key for saved sessions
pub const DEFAULT_STATE_KEY: &str = "karaokeNight.v1";

const OUTCOME_CAPACITY: usize = 32;

/// A finished song search, delivered back to the host
#[derive(Debug)]
pub struct SearchOutcome {
    pub request: SongRequest,
    pub result: FinderResult<Candidate>,
}

/// Whether the host loop should keep going after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    Quit,
}

pub struct SessionHost<V, S, R = StdRng>
where
    V: VideoSearch + 'static,
    S: SnapshotStore,
    R: Rng,
{
    controller: PlaybackController<R>,
    finder: Arc<KaraokeFinder<V>>,
    store: S,
    state_key: String,
    outcome_tx: mpsc::Sender<SearchOutcome>,
    outcome_rx: mpsc::Receiver<SearchOutcome>,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<V, S, R> SessionHost<V, S, R>
where
    V: VideoSearch + 'static,
    S: SnapshotStore,
    R: Rng,
{
    pub fn new(controller: PlaybackController<R>, finder: KaraokeFinder<V>, store: S) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Self {
            controller,
            finder: Arc::new(finder),
            store,
            state_key: DEFAULT_STATE_KEY.to_string(),
            outcome_tx,
            outcome_rx,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn with_state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = key.into();
        self
    }

    pub fn controller(&self) -> &PlaybackController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<R> {
        &mut self.controller
    }

    /// Sender that stops [`run`](Self::run) from outside the loop
    pub fn shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Load the stored session, if any; returns whether one was restored
    pub async fn restore(&mut self) -> bool {
        match self.store.load(&self.state_key).await {
            Ok(Some(snapshot)) => {
                self.controller.restore(snapshot);
                true
            }
            Ok(None) => {
                component_debug!(ComponentId::Session, "No stored session under '{}'", self.state_key);
                false
            }
            Err(e) => {
                component_warn!(ComponentId::Session, "Could not load stored session: {}", e);
                false
            }
        }
    }

    /// Best-effort save of the current snapshot
    pub async fn persist(&self) {
        let snapshot = self.controller.snapshot();
        if let Err(e) = self.store.save(&self.state_key, &snapshot).await {
            component_warn!(ComponentId::Session, "Could not save session, continuing in memory: {}", e);
        }
    }

    async fn clear_stored(&self) {
        if let Err(e) = self.store.clear(&self.state_key).await {
            component_warn!(ComponentId::Session, "Could not clear stored session: {}", e);
        }
    }

    /// Validate a request and start its search in the background
    ///
    /// The outcome arrives through [`next_search_outcome`](Self::next_search_outcome).
    pub fn request_song(&self, performer_ids: &[PerformerId], query: &str) -> SessionResult<SongRequest> {
        let request = self.controller.begin_request(performer_ids, query)?;
        let finder = Arc::clone(&self.finder);
        let outcome_tx = self.outcome_tx.clone();
        let pending = request.clone();

        tokio::spawn(async move {
            let result = finder.find_best(&pending.query).await;
            if outcome_tx.send(SearchOutcome { request: pending, result }).await.is_err() {
                component_debug!(ComponentId::Session, "Host gone before search finished");
            }
        });

        Ok(request)
    }

    /// Search and queue in one step, waiting for the search to finish
    pub async fn add_song(&mut self, performer_ids: &[PerformerId], query: &str) -> SessionResult<Option<EntryId>> {
        let request = self.controller.begin_request(performer_ids, query)?;
        let result = self.finder.find_best(&request.query).await;
        self.handle_search_outcome(SearchOutcome { request, result }).await
    }

    pub async fn next_search_outcome(&mut self) -> Option<SearchOutcome> {
        self.outcome_rx.recv().await
    }

    /// Queue the entry for a finished search; search failures are returned, not retried
    pub async fn handle_search_outcome(&mut self, outcome: SearchOutcome) -> SessionResult<Option<EntryId>> {
        let SearchOutcome { request, result } = outcome;
        let candidate = match result {
            Ok(candidate) => candidate,
            Err(e) => {
                component_warn!(ComponentId::Session, "Search for '{}' failed: {}", request.query, e);
                return Err(SessionError::SearchError(e));
            }
        };

        let added = self.controller.complete_request(request, candidate)?;
        if added.is_some() {
            self.persist().await;
        }
        Ok(added)
    }

    /// Run one command and describe the result for the terminal
    pub async fn execute(&mut self, command: Command) -> SessionResult<Reply> {
        let mutating = command.is_mutating();
        let message = match command {
            Command::AddSinger { name, nickname } => {
                let id = self.controller.register_performer(&name, &nickname, "")?;
                format!("🎙️ {} joined ({})", name, id)
            }
            Command::ListSingers => self.render_singers(),
            Command::AddSong { performers, query } => {
                let performer_ids = self.resolve_performers(&performers)?;
                let request = self.request_song(&performer_ids, &query)?;
                format!("🔎 Searching for '{}'...", request.query)
            }
            Command::ShowQueue => self.render_queue(),
            Command::Next => {
                self.controller.advance();
                self.render_status()
            }
            Command::Ended => {
                self.controller.media_ended();
                self.render_status()
            }
            Command::Force { entry } => {
                let id = self.resolve_entry(&entry)?;
                if !self.controller.set_forced_next(&id) {
                    return Err(SessionError::validation(format!("entry {id} is not queued")));
                }
                format!("📌 {} will play next", self.entry_label(&id))
            }
            Command::Remove { entry } => {
                let id = self.resolve_entry(&entry)?;
                match self.controller.remove_entry(&id) {
                    Some(removed) => format!("🗑️ Removed '{}'", removed.query),
                    None => return Err(SessionError::not_found(format!("entry {id}"))),
                }
            }
            Command::Reset => {
                self.controller.reset();
                self.clear_stored().await;
                "🧹 Queue cleared".to_string()
            }
            Command::Status => self.render_status(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        if mutating {
            self.persist().await;
        }
        Ok(Reply::Continue(message))
    }

    /// Process input lines and search outcomes until quit, end of input or shutdown
    pub async fn run(&mut self, mut lines: mpsc::Receiver<String>) -> SessionResult<()> {
        println!("{HELP}");

        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        component_debug!(ComponentId::Session, "Input closed");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let reply = match line.parse::<Command>() {
                        Ok(command) => self.execute(command).await,
                        Err(e) => Err(e),
                    };
                    match reply {
                        Ok(Reply::Continue(message)) => println!("{message}"),
                        Ok(Reply::Quit) => break,
                        Err(e) => println!("⚠️ {e}"),
                    }
                }

                Some(outcome) = self.outcome_rx.recv() => {
                    let query = outcome.request.query.clone();
                    match self.handle_search_outcome(outcome).await {
                        Ok(Some(id)) => println!("✅ Queued {}", self.entry_label(&id)),
                        Ok(None) => println!("⏭️ Dropped late result for '{query}'"),
                        Err(e) => println!("⚠️ {e}"),
                    }
                }

                Some(_) = self.shutdown_rx.recv() => {
                    component_debug!(ComponentId::Session, "🛑 Shutdown requested");
                    break;
                }
            }
        }

        self.persist().await;
        component_info!(ComponentId::Session, "Session host stopped");
        Ok(())
    }

    fn resolve_performers(&self, references: &[String]) -> SessionResult<Vec<PerformerId>> {
        references
            .iter()
            .map(|reference| {
                self.controller
                    .state()
                    .find_performer(reference)
                    .map(|p| p.id.clone())
                    .ok_or_else(|| SessionError::not_found(format!("singer '{reference}'")))
            })
            .collect()
    }

    fn resolve_entry(&self, reference: &str) -> SessionResult<EntryId> {
        self.controller
            .state()
            .find_entry(reference)
            .map(|e| e.id.clone())
            .ok_or_else(|| SessionError::not_found(format!("entry '{reference}'")))
    }

    fn performer_names(&self, performer_ids: &[PerformerId]) -> String {
        let state = self.controller.state();
        performer_ids
            .iter()
            .map(|id| state.performer(id).map_or_else(|| id.to_string(), |p| p.display_name.clone()))
            .collect::<Vec<_>>()
            .join(" & ")
    }

    fn entry_label(&self, id: &EntryId) -> String {
        match self.controller.state().entry(id) {
            Some(entry) => format!("'{}' ({})", entry.query, self.performer_names(&entry.performer_ids)),
            None => id.to_string(),
        }
    }

    fn render_singers(&self) -> String {
        let performers = self.controller.state().performers();
        if performers.is_empty() {
            return "No singers yet. Add one with: singer <name>".to_string();
        }

        let mut out = String::new();
        for (i, p) in performers.iter().enumerate() {
            let _ = writeln!(out, "{:>2}. {} \"{}\" [{}]", i + 1, p.display_name, p.nickname, p.id);
        }
        out.trim_end().to_string()
    }

    fn render_queue(&self) -> String {
        let state = self.controller.state();
        let queued = state.queued();
        if queued.is_empty() {
            return "Queue is empty".to_string();
        }

        let mut out = String::new();
        for (i, entry) in queued.iter().enumerate() {
            let mut marks = String::new();
            if state.current_entry_id() == Some(&entry.id) {
                marks.push_str(" ▶");
            }
            if state.forced_next_id() == Some(&entry.id) {
                marks.push_str(" 📌");
            }
            let _ = writeln!(
                out,
                "{:>2}. {} - {}{} [{}]",
                i + 1,
                entry.query,
                self.performer_names(&entry.performer_ids),
                marks,
                entry.id
            );
        }
        out.trim_end().to_string()
    }

    fn render_status(&self) -> String {
        let Some(now) = self.controller.now_playing() else {
            return format!("⏹️ Idle, {} songs queued", self.controller.state().queued_count());
        };

        let names: Vec<&str> = now.performers.iter().map(|p| p.display_name.as_str()).collect();
        let track = now
            .entry
            .selected_candidate
            .as_ref()
            .map(|c| format!("{} [{}]", c.title, c.external_id))
            .unwrap_or_else(|| now.entry.query.clone());
        let prefix = match now.state {
            PlaybackState::AwaitingNext => "⏸️ Up next (type 'next' to start)",
            _ => "▶️ Now playing",
        };

        format!(
            "{}: {} by {}, {} songs queued",
            prefix,
            track,
            names.join(" & "),
            now.remaining
        )
    }
}
