//! Local filesystem snapshot store.
//!
//! One JSON file holding the full `fingerprint -> Snapshot` mapping, loaded
//! on open and rewritten atomically (write to temp, then rename) on every
//! save. The per-tool rewrite means a failure while processing a later tool
//! never corrupts the snapshots already saved for earlier tools.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Local JSON file storage backend.
pub struct LocalStore {
    path: PathBuf,
    snapshots: BTreeMap<String, Snapshot>,
}

impl LocalStore {
    /// Open the store at `path`, loading any existing snapshots.
    ///
    /// A missing file is an empty store, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshots = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(AppError::Io(e)),
        };

        Ok(Self { path, snapshots })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of tracked tools.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Write the full mapping atomically.
    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&self.snapshots)?;
        let tmp = self.path.with_extension("tmp");

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.flush()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SnapshotStore for LocalStore {
    fn load(&self, fingerprint: &str) -> Result<Option<Snapshot>> {
        Ok(self.snapshots.get(fingerprint).cloned())
    }

    fn save(&mut self, fingerprint: &str, snapshot: &Snapshot) -> Result<()> {
        self.snapshots
            .insert(fingerprint.to_string(), snapshot.clone());
        self.flush()
    }

    fn fingerprints(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_record, snapshot_of};
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::open(tmp.path().join("snapshots.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshots.json");
        let snapshot = snapshot_of(&[sample_record()]);

        {
            let mut store = LocalStore::open(&path).unwrap();
            store.save("abc123", &snapshot).unwrap();
        }

        // A fresh open sees exactly what was saved
        let store = LocalStore::open(&path).unwrap();
        let loaded = store.load("abc123").unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(store.load("unknown").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_prior_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshots.json");
        let mut store = LocalStore::open(&path).unwrap();

        let mut first = sample_record();
        store.save("abc123", &snapshot_of(&[first.clone()])).unwrap();

        first.grade = Some(60.0);
        let mut second = sample_record();
        second.id = 102;
        store
            .save("abc123", &snapshot_of(&[first.clone(), second]))
            .unwrap();

        let loaded = LocalStore::open(&path)
            .unwrap()
            .load("abc123")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("101").unwrap().grade, Some(60.0));
    }

    #[test]
    fn test_fingerprints_are_independent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshots.json");
        let mut store = LocalStore::open(&path).unwrap();

        store.save("tool-a", &snapshot_of(&[sample_record()])).unwrap();
        store.save("tool-b", &Snapshot::new()).unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.load("tool-a").unwrap().unwrap().len(), 1);
        assert!(store.load("tool-b").unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_optional_absence() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshots.json");

        let mut record = sample_record();
        record.grade = None;
        record.submitted_date = None;

        let mut store = LocalStore::open(&path).unwrap();
        store.save("k", &snapshot_of(&[record])).unwrap();

        let loaded = LocalStore::open(&path).unwrap().load("k").unwrap().unwrap();
        let back = loaded.get("101").unwrap();
        assert!(back.grade.is_none());
        assert!(back.submitted_date.is_none());
    }
}
