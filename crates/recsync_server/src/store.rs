//! Record storage seam.

use crate::error::ServerResult;
use parking_lot::RwLock;
use recsync_engine::check_conflicts;
use recsync_protocol::{Record, RecordMap, RecordPointer, VersionConflict};
use tracing::debug;

/// Result of a compare-and-persist attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Every modified record was persisted.
    Committed,
    /// Nothing was persisted.
    Rejected {
        /// Records whose stored version moved since the read.
        conflicts: Vec<VersionConflict>,
        /// Records that were read but no longer exist.
        missing: Vec<RecordPointer>,
    },
}

impl CommitOutcome {
    /// Returns true if the candidate was persisted.
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed)
    }
}

/// Durable storage for records.
///
/// `commit` must make the version check and the write atomic with respect to
/// other writers touching the same records.
pub trait RecordStore: Send + Sync {
    /// Loads whichever of `pointers` exist.
    fn load(&self, pointers: &[RecordPointer]) -> ServerResult<RecordMap>;

    /// Persists the `modified` records of `candidate` iff their stored
    /// versions still match `original`.
    fn commit(
        &self,
        original: &RecordMap,
        candidate: &RecordMap,
        modified: &[RecordPointer],
    ) -> ServerResult<CommitOutcome>;
}

/// An in-memory record store.
///
/// Commits reload, compare and persist under a single write lock.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<RecordMap>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`.
    pub fn with_records(records: RecordMap) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Inserts or replaces a record, bypassing version checks.
    pub fn insert(&self, table: impl Into<String>, record: Record) {
        self.records.write().insert(table, record);
    }

    /// Removes a record.
    pub fn remove(&self, pointer: &RecordPointer) -> Option<Record> {
        self.records.write().remove(&pointer.table, &pointer.id)
    }

    /// Returns a copy of one record.
    pub fn get(&self, pointer: &RecordPointer) -> Option<Record> {
        self.records.read().get_pointer(pointer).cloned()
    }

    /// Returns a copy of every stored record.
    pub fn snapshot(&self) -> RecordMap {
        self.records.read().clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, pointers: &[RecordPointer]) -> ServerResult<RecordMap> {
        Ok(self.records.read().subset(pointers))
    }

    fn commit(
        &self,
        original: &RecordMap,
        candidate: &RecordMap,
        modified: &[RecordPointer],
    ) -> ServerResult<CommitOutcome> {
        let mut records = self.records.write();
        let current = records.subset(modified);

        let conflicts = check_conflicts(original, &current, modified);
        let missing: Vec<RecordPointer> = modified
            .iter()
            .filter(|p| original.contains(p) && !current.contains(p))
            .cloned()
            .collect();
        if !conflicts.is_empty() || !missing.is_empty() {
            return Ok(CommitOutcome::Rejected { conflicts, missing });
        }

        for pointer in modified {
            if let Some(record) = candidate.get_pointer(pointer) {
                records.insert(pointer.table.clone(), record.clone());
            }
        }
        debug!(records = modified.len(), "persisted candidate records");
        Ok(CommitOutcome::Committed)
    }
}
