//! Transaction applier.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::list::{list_insert, list_remove};
use crate::path::{has_empty_segment, FieldPath};
use recsync_protocol::{Operation, OperationKind, RecordMap, RecordPointer, Transaction};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of applying a batch of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// The candidate snapshot with every operation applied.
    pub records: RecordMap,
    /// Records touched by the batch, deduplicated, in first-touch order.
    pub modified: Vec<RecordPointer>,
}

impl ApplyOutcome {
    /// Returns only the modified records.
    pub fn modified_records(&self) -> RecordMap {
        self.records.subset(&self.modified)
    }
}

/// Applies operations to a deep copy of a record snapshot.
///
/// Application is all-or-nothing: the first missing record or protected
/// field aborts the batch and no candidate map is returned. The input
/// snapshot is never mutated.
pub struct TransactionApplier {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl TransactionApplier {
    /// Creates an applier that stamps `setNow` with the system clock.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used by `setNow`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies `operations` in order to a copy of `records`.
    pub fn apply(
        &self,
        records: &RecordMap,
        operations: &[Operation],
    ) -> EngineResult<ApplyOutcome> {
        let mut working = records.clone();
        let mut seen = HashSet::new();
        let mut modified = Vec::new();

        for op in operations {
            let record = working.get_mut(&op.table, &op.id).ok_or_else(|| {
                EngineError::RecordNotFound {
                    table: op.table.clone(),
                    id: op.id,
                }
            })?;

            if has_empty_segment(&op.key) {
                return Err(EngineError::InvalidPath {
                    key: op.key.clone(),
                });
            }

            let root = op.root_field();
            if self.config.protected_fields.contains(root) {
                return Err(EngineError::ProtectedField {
                    field: root.to_string(),
                });
            }

            let next = record.version.checked_add(1);
            record.version = next.ok_or_else(|| EngineError::VersionOverflow {
                table: op.table.clone(),
                id: op.id,
            })?;
            self.mutate(&mut record.fields, op);

            if seen.insert((op.table.as_str(), op.id)) {
                modified.push(op.pointer());
            }
        }

        Ok(ApplyOutcome {
            records: working,
            modified,
        })
    }

    /// Applies every operation of a transaction.
    pub fn apply_transaction(
        &self,
        records: &RecordMap,
        transaction: &Transaction,
    ) -> EngineResult<ApplyOutcome> {
        let outcome = self.apply(records, &transaction.operations)?;
        debug!(
            tx_id = %transaction.tx_id,
            author_id = %transaction.author_id,
            operations = transaction.operations.len(),
            modified = outcome.modified.len(),
            "applied transaction"
        );
        Ok(outcome)
    }

    fn mutate(&self, fields: &mut Map<String, Value>, op: &Operation) {
        let Some(path) = FieldPath::parse(&op.key) else {
            warn!(
                table = %op.table,
                id = %op.id,
                key = %op.key,
                op = op.kind.type_name(),
                "ignoring unsafe field path"
            );
            return;
        };

        match &op.kind {
            OperationKind::Set { value } => path.set(fields, value.clone()),
            OperationKind::SetNow => path.set(fields, Value::String(self.clock.timestamp())),
            OperationKind::ListInsert { value, position } => {
                list_insert(fields, &path, value.clone(), position)
            }
            OperationKind::ListRemove { value } => list_remove(fields, &path, value),
        }
    }
}

impl Default for TransactionApplier {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for TransactionApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionApplier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
