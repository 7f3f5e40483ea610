//! File-backed snapshot store
//!
//! One pretty-printed JSON file per key under a base directory. Saves write a
//! temporary file and rename it over the old one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use shared::{component_debug, ComponentId, Snapshot};

use crate::error::{SessionError, SessionResult};
use crate::traits::SnapshotStore;

/// Default directory for stored sessions
pub const DEFAULT_STATE_DIR: &str = "./karaoke-state";

pub struct FileSnapshotStore {
    base_dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new() -> Self {
        Self::with_base_dir(PathBuf::from(DEFAULT_STATE_DIR))
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File holding the snapshot for `key`
    pub fn snapshot_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", file_stem(key)))
    }

    fn persistence_error(operation: &str, path: &Path) -> SessionError {
        SessionError::PersistenceError {
            operation: operation.to_string(),
            path: path.display().to_string(),
        }
    }
}

impl Default for FileSnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys such as `karaokeNight.v1` map to safe file names
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('.');

    if stem.is_empty() {
        "session".to_string()
    } else {
        stem.to_string()
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> SessionResult<Option<Snapshot>> {
        let path = self.snapshot_path(key);
        if fs::metadata(&path).await.is_err() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let snapshot = Snapshot::from_json(&content)?;
        component_debug!(ComponentId::Session, "📂 Loaded snapshot from {}", path.display());
        Ok(Some(snapshot))
    }

    async fn save(&self, key: &str, snapshot: &Snapshot) -> SessionResult<()> {
        let path = self.snapshot_path(key);
        let temp_path = path.with_extension("json.tmp");
        let content = snapshot.to_json()?;

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|_| Self::persistence_error("create_dir", &self.base_dir))?;
        fs::write(&temp_path, content)
            .await
            .map_err(|_| Self::persistence_error("write", &temp_path))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|_| Self::persistence_error("rename", &path))?;

        component_debug!(
            ComponentId::Session,
            "💾 Saved {} entries to {}",
            snapshot.entries.len(),
            path.display()
        );
        Ok(())
    }

    async fn clear(&self, key: &str) -> SessionResult<()> {
        let path = self.snapshot_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(_) => Err(Self::persistence_error("remove", &path)),
        }
    }
}
