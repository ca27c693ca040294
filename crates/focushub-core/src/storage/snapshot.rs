//! JSON snapshot persistence for the whole hub.
//!
//! One file holds the full state. Saves go through a sibling temp file and
//! a rename, so the previous snapshot stays valid until the new one is
//! completely on disk. The engine's tick anchor is excluded from the file
//! by its own serde attributes; restoring re-anchors at load time, which is
//! what keeps offline periods out of the uptime and focus counters.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::StorageError;
use crate::habits::Habit;
use crate::notes::NoteItem;
use crate::planner::TaskItem;
use crate::quote::QuoteItem;
use crate::store::{Aggregates, ViewKey};
use crate::timer::{SessionLog, TimerEngine};

/// Snapshot file name inside the data directory.
pub const SNAPSHOT_FILE: &str = "hub.json";

/// Serialized form of the whole hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSnapshot {
    #[serde(default)]
    pub view: ViewKey,
    pub timer: TimerEngine,
    #[serde(default)]
    pub aggregates: Aggregates,
    #[serde(default)]
    pub focus_sessions: SessionLog,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
    #[serde(default)]
    pub notes: Vec<NoteItem>,
    #[serde(default)]
    pub quote: Option<QuoteItem>,
    pub saved_at: DateTime<Utc>,
}

/// File-backed snapshot storage.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store at [`SNAPSHOT_FILE`] in the data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::at(data_dir()?.join(SNAPSHOT_FILE)))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing file reads as `None`; a present but
    /// unparseable file is an error and is left untouched on disk.
    pub fn load(&self) -> Result<Option<HubSnapshot>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        let snapshot = serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    /// Write the snapshot atomically (temp file, then rename).
    pub fn save(&self, snapshot: &HubSnapshot) -> Result<(), StorageError> {
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|e| StorageError::WriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::WriteFailed {
            path: tmp.clone(),
            message: e.to_string(),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    /// Fire-and-forget save. Failures are logged and swallowed so a
    /// persistence problem never turns into a failed mutation.
    pub fn save_quietly(&self, snapshot: &HubSnapshot) {
        if let Err(e) = self.save(snapshot) {
            warn!(error = %e, "snapshot save failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HubStore;
    use crate::timer::PomodoroSettings;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> SnapshotStore {
        SnapshotStore::at(dir.path().join(SNAPSHOT_FILE))
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let files = store_in(&dir);

        let mut hub = HubStore::new(PomodoroSettings::default(), at(0));
        hub.add_habit("Read", "", at(0));
        hub.add_task("Essay", crate::planner::TaskCategory::Coursework);
        files.save(&hub.snapshot(at(60))).unwrap();

        let loaded = files.load().unwrap().unwrap();
        assert_eq!(loaded.saved_at, at(60));
        assert_eq!(loaded.habits.len(), 1);
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.timer.mode(), hub.timer().mode());
        assert_eq!(loaded.timer.remaining_ms(), hub.timer().remaining_ms());
        assert_eq!(loaded.timer.settings(), hub.timer().settings());
    }

    #[test]
    fn save_replaces_the_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let files = store_in(&dir);

        let hub = HubStore::new(PomodoroSettings::default(), at(0));
        files.save(&hub.snapshot(at(10))).unwrap();
        files.save(&hub.snapshot(at(20))).unwrap();

        let loaded = files.load().unwrap().unwrap();
        assert_eq!(loaded.saved_at, at(20));
        // No temp file left behind.
        assert!(!files.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_errors_without_clobbering() {
        let dir = tempfile::tempdir().unwrap();
        let files = store_in(&dir);
        fs::write(files.path(), "{ not json").unwrap();

        let err = files.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
        // The broken file is still there for inspection.
        assert_eq!(fs::read_to_string(files.path()).unwrap(), "{ not json");
    }

    #[test]
    fn tick_anchor_never_reaches_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = store_in(&dir);

        let mut hub = HubStore::new(PomodoroSettings::default(), at(0));
        hub.start_timer();
        hub.tick(at(30));
        files.save(&hub.snapshot(at(30))).unwrap();

        let raw = fs::read_to_string(files.path()).unwrap();
        assert!(!raw.contains("last_tick_ms"));
    }
}
