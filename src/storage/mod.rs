// src/storage/mod.rs

//! Persistent snapshot storage.
//!
//! Logically a durable mapping `fingerprint -> Snapshot`. The store has one
//! reader and one writer per run (the process itself); concurrent runs
//! against the same store are the caller's problem to prevent.

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::Snapshot;

/// A durable mapping from tool fingerprint to its last-seen snapshot.
pub trait SnapshotStore {
    /// Load the snapshot stored under `fingerprint`, if any.
    fn load(&self, fingerprint: &str) -> Result<Option<Snapshot>>;

    /// Store `snapshot` under `fingerprint`, replacing any prior snapshot
    /// entirely. Must be durable on return.
    fn save(&mut self, fingerprint: &str, snapshot: &Snapshot) -> Result<()>;

    /// Fingerprints with a stored snapshot.
    fn fingerprints(&self) -> Vec<String>;
}
