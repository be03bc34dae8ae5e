//! In-process snapshot store.
//!
//! Backs dry runs and tests; nothing survives the process.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Volatile storage backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<String, Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, fingerprint: &str) -> Result<Option<Snapshot>> {
        Ok(self.snapshots.get(fingerprint).cloned())
    }

    fn save(&mut self, fingerprint: &str, snapshot: &Snapshot) -> Result<()> {
        self.snapshots
            .insert(fingerprint.to_string(), snapshot.clone());
        Ok(())
    }

    fn fingerprints(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_record, snapshot_of};

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let snapshot = snapshot_of(&[sample_record()]);

        assert!(store.load("k").unwrap().is_none());
        store.save("k", &snapshot).unwrap();
        assert_eq!(store.load("k").unwrap().unwrap(), snapshot);
        assert_eq!(store.fingerprints(), vec!["k".to_string()]);
    }
}
