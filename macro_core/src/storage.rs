//! Persisted application state with file locking.
//!
//! The whole [`AppState`] is stored as one JSON document named after the
//! `macro-tracker-storage` key. It is read once at startup and rewritten
//! wholesale after every change.

use crate::{AppState, Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the persisted snapshot inside the data directory
pub const STORAGE_FILE: &str = "macro-tracker-storage.json";

/// Receives the full state after each successful mutation
pub trait StateSink {
    fn persist(&mut self, state: &AppState) -> Result<()>;
}

/// JSON snapshot file with locking and atomic replacement
#[derive(Clone, Debug)]
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    /// Snapshot stored at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot stored under the standard name in `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORAGE_FILE))
    }

    /// Load the snapshot with shared locking
    ///
    /// Returns `None` if the file doesn't exist.
    /// If the file is unreadable or corrupted, logs a warning and returns `None`
    /// so the caller starts from fresh state.
    pub fn load(&self) -> Result<Option<AppState>> {
        let path = &self.path;
        if !path.exists() {
            tracing::info!("No state file found at {:?}, starting fresh", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open state file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock state file {:?}: {}. Starting fresh.",
                path,
                e
            );
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read state file {:?}: {}. Starting fresh.",
                path,
                e
            );
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<AppState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded state from {:?}", path);
                Ok(Some(state))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Write the snapshot atomically with exclusive locking
    ///
    /// 1. Write to a temp file in the same directory
    /// 2. Sync to disk
    /// 3. Rename over the original
    pub fn save(&self, state: &AppState) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::State(format!("state path {:?} has no parent", self.path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, state)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved state to {:?}", self.path);
        Ok(())
    }
}

impl StateSink for JsonStateFile {
    fn persist(&mut self, state: &AppState) -> Result<()> {
        self.save(state)
    }
}

/// In-memory sink keeping the latest snapshot, for tests and dry runs
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub last: Option<AppState>,
    pub writes: usize,
}

impl StateSink for MemorySink {
    fn persist(&mut self, state: &AppState) -> Result<()> {
        self.last = Some(state.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{demo::demo_saved_days, Sex, User};
    use chrono::NaiveDate;

    fn test_state() -> AppState {
        let user = User {
            id: "1".into(),
            age: 38,
            sex: Sex::Male,
            height_cm: 183.0,
            weight_lb: 169.0,
            activity_multiplier: 1.5,
            protein_target_g_per_lb: 1.0,
        };
        let mut state = AppState::new(user, NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
        state.saved_days = demo_saved_days().to_vec();
        state
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStateFile::in_dir(temp_dir.path());

        let state = test_state();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_persisted_layout_uses_storage_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStateFile::in_dir(temp_dir.path());
        store.save(&test_state()).unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join(STORAGE_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for key in ["user", "currentDate", "dailyEntry", "foodLogs", "workoutLogs", "savedDays"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["currentDate"], "2026-02-09");
        assert_eq!(value["savedDays"][0]["totalCalories"], 2150.0);
        assert_eq!(value["user"]["sex"], "M");
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStateFile::in_dir(temp_dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupted_state_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(STORAGE_FILE);
        std::fs::write(&path, "{ invalid json }").unwrap();

        let store = JsonStateFile::new(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonStateFile::in_dir(temp_dir.path());

        store.persist(&test_state()).unwrap();
        store.persist(&test_state()).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != STORAGE_FILE)
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only {}, found extras: {:?}",
            STORAGE_FILE,
            extras
        );
    }

    #[test]
    fn test_memory_sink_counts_writes() {
        let mut sink = MemorySink::default();
        sink.persist(&test_state()).unwrap();
        sink.persist(&test_state()).unwrap();
        assert_eq!(sink.writes, 2);
        assert!(sink.last.is_some());
    }
}
