//! Version conflict reports.

use crate::record::RecordPointer;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A record whose stored version moved between the client's read and commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionConflict {
    /// Table of the conflicting record.
    pub table: String,
    /// ID of the conflicting record.
    pub id: Uuid,
    /// Version in the snapshot the transaction was built against.
    pub expected_version: u64,
    /// Version currently stored.
    pub actual_version: u64,
}

impl VersionConflict {
    /// Creates a new conflict.
    pub fn new(
        table: impl Into<String>,
        id: Uuid,
        expected_version: u64,
        actual_version: u64,
    ) -> Self {
        Self {
            table: table.into(),
            id,
            expected_version,
            actual_version,
        }
    }

    /// Returns the pointer to the conflicting record.
    pub fn pointer(&self) -> RecordPointer {
        RecordPointer::new(self.table.clone(), self.id)
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: expected version {}, found {}",
            self.table, self.id, self.expected_version, self.actual_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conflict_json_shape() {
        let conflict = VersionConflict::new("users", Uuid::from_u128(1), 5, 6);
        assert_eq!(
            serde_json::to_value(&conflict).unwrap(),
            json!({
                "table": "users",
                "id": "00000000-0000-0000-0000-000000000001",
                "expectedVersion": 5,
                "actualVersion": 6
            })
        );
    }

    #[test]
    fn conflict_display_and_pointer() {
        let conflict = VersionConflict::new("users", Uuid::from_u128(1), 5, 6);
        let msg = conflict.to_string();
        assert!(msg.contains("expected version 5"));
        assert!(msg.contains("found 6"));
        assert_eq!(conflict.pointer(), RecordPointer::new("users", Uuid::from_u128(1)));
    }
}
