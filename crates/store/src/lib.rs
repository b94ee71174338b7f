//! Session persistence.
//!
//! A store holds at most one [`SessionSnapshot`]. Saving replaces it; loading
//! fails soft: a missing, unreadable, malformed or inconsistent snapshot is
//! reported as "nothing saved" (with a warning in the log) so the game can
//! fall back to a fresh session.
//!
//! - [`JsonFileStore`]: one JSON document on disk, replaced atomically
//! - [`MemoryStore`]: same encoding, kept in memory (persistence disabled, tests)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

pub use mahjong_match_core as core;

use crate::core::SessionSnapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SnapshotStore {
    /// Replace the stored snapshot. Saving the same snapshot twice is harmless.
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), StoreError>;

    /// The stored snapshot, or `None` if there is no usable one
    fn load(&self) -> Option<SessionSnapshot>;
}

/// Decode and validate; `source` names the store in log messages
fn decode(text: &str, source: &str) -> Option<SessionSnapshot> {
    let snapshot: SessionSnapshot = match serde_json::from_str(text) {
        Ok(s) => s,
        Err(e) => {
            warn!("discarding malformed snapshot from {}: {}", source, e);
            return None;
        }
    };
    if let Err(e) = snapshot.validate() {
        warn!("discarding inconsistent snapshot from {}: {}", source, e);
        return None;
    }
    Some(snapshot)
}

/// Snapshot as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    /// Written to a sibling temp file and renamed over the target, so a crash
    /// mid-write never leaves a truncated snapshot behind.
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Option<SessionSnapshot> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no snapshot at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("cannot read snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };
        decode(&text, &self.path.display().to_string())
    }
}

/// Snapshot kept in memory, JSON-encoded like the file store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with arbitrary text
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            saves: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        self.json = Some(serde_json::to_string(snapshot)?);
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Option<SessionSnapshot> {
        decode(self.json.as_deref()?, "memory")
    }
}
