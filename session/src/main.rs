//! Main entry point for the karaoke binary
//!
//! Wires the playback controller to the YouTube search and a file snapshot
//! store, then reads commands from stdin until quit or Ctrl+C.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};

use finder::{FinderConfig, KaraokeFinder, SearchBackend};
use session::{FileSnapshotStore, PlaybackController, SessionEvent, SessionHost, DEFAULT_STATE_KEY};
use shared::{component_debug, component_info, logging, ComponentId};

/// Karaoke night: fair singer rotation over a shared song queue
#[derive(Parser)]
#[command(name = "karaoke")]
#[command(about = "Rotates singers fairly and picks karaoke tracks for their songs")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Directory holding saved sessions
    #[arg(long, default_value = session::services::DEFAULT_STATE_DIR)]
    pub state_dir: String,

    /// Key of the saved session to load and update
    #[arg(long, default_value = DEFAULT_STATE_KEY)]
    pub state_key: String,

    /// Seed for the singer rotation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Search results to rank per song
    #[arg(long, default_value = "10")]
    pub max_results: u32,

    /// Phrase appended to every song search
    #[arg(long, default_value = finder::config::DEFAULT_QUERY_SUFFIX)]
    pub search_suffix: String,

    /// Run without searching; songs cannot be added
    #[arg(long)]
    pub offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(ComponentId::Session, "karaoke session");

    let config = FinderConfig::from_env()
        .with_max_results(args.max_results)
        .with_query_suffix(args.search_suffix.clone());
    let backend = SearchBackend::from_config(config, args.offline)?;
    if backend.is_offline() {
        component_info!(ComponentId::Session, "📴 Offline mode: songs cannot be added");
    }

    let controller = match args.seed {
        Some(seed) => PlaybackController::seeded(seed),
        None => PlaybackController::new(),
    };
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    component_debug!(ComponentId::Session, "Event log skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let store = FileSnapshotStore::with_base_dir(&args.state_dir);
    let mut host =
        SessionHost::new(controller, KaraokeFinder::new(backend), store).with_state_key(args.state_key.clone());
    if host.restore().await {
        component_info!(
            ComponentId::Session,
            "Resumed session '{}' with {} queued songs",
            args.state_key,
            host.controller().state().queued_count()
        );
    }

    let shutdown_sender = host.shutdown_sender();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(ComponentId::Session, "Received Ctrl+C signal");
                let _ = shutdown_sender.send(()).await;
            }
            Err(err) => {
                logging::log_error(ComponentId::Session, "Signal handling", &err);
            }
        }
    });

    let (line_tx, line_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    host.run(line_rx).await?;

    logging::log_success(ComponentId::Session, "Karaoke session stopped gracefully");
    Ok(())
}

fn log_event(event: &SessionEvent) {
    match serde_json::to_string(event) {
        Ok(json) => component_debug!(ComponentId::Session, "📣 {}", json),
        Err(_) => component_debug!(ComponentId::Session, "📣 {:?}", event),
    }
}
