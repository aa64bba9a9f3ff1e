//! Error types for the engine.

use recsync_protocol::RecordPointer;
use thiserror::Error;
use uuid::Uuid;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Structural errors that abort a whole transaction.
///
/// None of these are retryable: they signal a stale or wrong pointer, or a
/// policy violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An operation referenced a record missing from the snapshot.
    #[error("record not found: {table}/{id}")]
    RecordNotFound {
        /// Table of the missing record.
        table: String,
        /// ID of the missing record.
        id: Uuid,
    },

    /// An operation targeted a protected root field.
    #[error("field cannot be modified: {field}")]
    ProtectedField {
        /// The protected root field.
        field: String,
    },

    /// An operation key has an empty path segment.
    #[error("invalid field path: {key:?}")]
    InvalidPath {
        /// The offending key.
        key: String,
    },

    /// A record's version cannot be incremented any further.
    #[error("version overflow on {table}/{id}")]
    VersionOverflow {
        /// Table of the record.
        table: String,
        /// ID of the record.
        id: Uuid,
    },
}

impl EngineError {
    /// Returns the record the error is about, if any.
    pub fn pointer(&self) -> Option<RecordPointer> {
        match self {
            EngineError::RecordNotFound { table, id }
            | EngineError::VersionOverflow { table, id } => {
                Some(RecordPointer::new(table.clone(), *id))
            }
            EngineError::ProtectedField { .. } | EngineError::InvalidPath { .. } => None,
        }
    }
}
