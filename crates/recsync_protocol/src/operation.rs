//! Mutation operations.

use crate::error::{ProtocolError, ProtocolResult};
use crate::record::RecordPointer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Where a `listInsert` places its value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "pivot", rename_all = "camelCase")]
pub enum ListPosition {
    /// Insert at the front of the list.
    Prepend,
    /// Insert at the end of the list.
    #[default]
    Append,
    /// Insert before the first element equal to the pivot.
    Before(Value),
    /// Insert after the first element equal to the pivot.
    After(Value),
}

/// The mutation an [`Operation`] performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OperationKind {
    /// Assign `value` at the path.
    Set {
        /// Value to write.
        value: Value,
    },
    /// Assign the current instant, as an ISO-8601 string, at the path.
    SetNow,
    /// Insert `value` into the list at the path.
    ListInsert {
        /// Value to insert.
        value: Value,
        /// Where to insert it.
        #[serde(default)]
        position: ListPosition,
    },
    /// Remove every element equal to `value` from the list at the path.
    ListRemove {
        /// Value to remove.
        value: Value,
    },
}

impl OperationKind {
    /// Returns the wire discriminant.
    pub fn type_name(&self) -> &'static str {
        match self {
            OperationKind::Set { .. } => "set",
            OperationKind::SetNow => "setNow",
            OperationKind::ListInsert { .. } => "listInsert",
            OperationKind::ListRemove { .. } => "listRemove",
        }
    }
}

/// A single mutation against one record.
///
/// Every operation carries its own `table`/`id` so that it stays addressable
/// on its own, even when a transaction groups several operations against the
/// same record.
///
/// On the wire an operation is a flat JSON object:
///
/// ```json
/// {"type": "set", "table": "users", "id": "…", "key": "settings.theme", "value": "dark"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Table of the target record.
    pub table: String,
    /// ID of the target record.
    pub id: Uuid,
    /// Dot-separated field path.
    pub key: String,
    /// The mutation.
    #[serde(flatten)]
    pub kind: OperationKind,
}

impl Operation {
    /// Creates an operation.
    pub fn new(
        table: impl Into<String>,
        id: Uuid,
        key: impl Into<String>,
        kind: OperationKind,
    ) -> Self {
        Self {
            table: table.into(),
            id,
            key: key.into(),
            kind,
        }
    }

    /// Creates a `set` operation.
    pub fn set(table: impl Into<String>, id: Uuid, key: impl Into<String>, value: Value) -> Self {
        Self::new(table, id, key, OperationKind::Set { value })
    }

    /// Creates a `setNow` operation.
    pub fn set_now(table: impl Into<String>, id: Uuid, key: impl Into<String>) -> Self {
        Self::new(table, id, key, OperationKind::SetNow)
    }

    /// Creates a `listInsert` operation.
    pub fn list_insert(
        table: impl Into<String>,
        id: Uuid,
        key: impl Into<String>,
        value: Value,
        position: ListPosition,
    ) -> Self {
        Self::new(table, id, key, OperationKind::ListInsert { value, position })
    }

    /// Creates a `listRemove` operation.
    pub fn list_remove(
        table: impl Into<String>,
        id: Uuid,
        key: impl Into<String>,
        value: Value,
    ) -> Self {
        Self::new(table, id, key, OperationKind::ListRemove { value })
    }

    /// Returns the pointer to the record this operation targets.
    pub fn pointer(&self) -> RecordPointer {
        RecordPointer::new(self.table.clone(), self.id)
    }

    /// Returns the first segment of the key (everything before the first `.`).
    pub fn root_field(&self) -> &str {
        self.key.split('.').next().unwrap_or_default()
    }

    /// Checks the envelope constraints.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.table.is_empty() {
            return Err(ProtocolError::invalid_operation("table must not be empty"));
        }
        if self.key.is_empty() {
            return Err(ProtocolError::invalid_operation("key must not be empty"));
        }
        if self.key.split('.').any(str::is_empty) {
            return Err(ProtocolError::invalid_operation(format!(
                "key has an empty segment: {:?}",
                self.key
            )));
        }
        Ok(())
    }

    /// Decodes an operation from an untyped body and validates it.
    pub fn from_value(value: Value) -> ProtocolResult<Self> {
        let operation: Operation = serde_json::from_value(value)?;
        operation.validate()?;
        Ok(operation)
    }
}

/// Returns the distinct records referenced by a batch, in first-seen order.
///
/// Callers use this to know which records to fetch before applying.
pub fn collect_pointers(operations: &[Operation]) -> Vec<RecordPointer> {
    let mut seen = HashSet::new();
    let mut pointers = Vec::new();
    for op in operations {
        if seen.insert((op.table.as_str(), op.id)) {
            pointers.push(op.pointer());
        }
    }
    pointers
}
