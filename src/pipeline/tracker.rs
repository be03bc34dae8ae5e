//! Persistent change tracking for coursework tools.
//!
//! The tracker owns the snapshot store and decides which assignment records
//! are worth notifying about: anything never seen under a tracked tool's
//! fingerprint, or anything whose stored record differs in any field.

use crate::error::Result;
use crate::models::{AssignmentRecord, ToolReference, snapshot_of};
use crate::pipeline::fingerprint;
use crate::services::parse_assignments;
use crate::session::Fetch;
use crate::storage::SnapshotStore;

/// Tracks coursework state across runs via a persistent snapshot store.
pub struct ChangeTracker<S: SnapshotStore> {
    store: S,
}

impl<S: SnapshotStore> ChangeTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a tool's current assignments and diff them against its stored
    /// snapshot. See [`Self::diff`] for the diff rules.
    pub fn check(
        &mut self,
        fetcher: &mut dyn Fetch,
        tool: &ToolReference,
    ) -> Result<Vec<AssignmentRecord>> {
        let html = fetcher.fetch(&tool.url)?;
        let current = parse_assignments(&html, &tool.url)?;
        self.diff(&tool.url, &current)
    }

    /// Diff `current` against the snapshot stored for `tool_url`.
    ///
    /// First-seen rule: a tool with no stored snapshot gets a baseline and
    /// an empty diff, so a fresh install never notifies about everything.
    ///
    /// Otherwise a record is in the diff iff its id is new or its stored
    /// record differs in any field. Ids that vanished from the live listing
    /// are dropped from the snapshot without a diff entry. The updated
    /// snapshot fully replaces the stored one and is persisted before
    /// returning, so a failure on a later tool cannot lose this one.
    pub fn diff(
        &mut self,
        tool_url: &str,
        current: &[AssignmentRecord],
    ) -> Result<Vec<AssignmentRecord>> {
        let key = fingerprint(tool_url);
        let next = snapshot_of(current);

        let Some(previous) = self.store.load(&key)? else {
            self.store.save(&key, &next)?;
            return Ok(Vec::new());
        };

        let mut diffs = Vec::new();
        for record in current {
            match previous.get(&record.id.to_string()) {
                Some(stored) if stored == record => {}
                _ => diffs.push(record.clone()),
            }
        }

        self.store.save(&key, &next)?;
        Ok(diffs)
    }
}
