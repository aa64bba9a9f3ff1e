//! Request and response messages.

use crate::conflict::VersionConflict;
use crate::error::{ProtocolError, ProtocolResult};
use crate::record::{RecordMap, RecordPointer};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on pointers in a single GetRecords request.
pub const MAX_POINTERS_PER_REQUEST: usize = 100;

/// A write request is a single transaction.
pub type WriteRequest = Transaction;

/// Result of a write that did not fail validation or application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WriteResponse {
    /// The transaction was committed.
    Success {
        /// The updated records, and only those.
        #[serde(rename = "recordMap")]
        record_map: RecordMap,
    },
    /// Some touched records changed since the client read them.
    Conflict {
        /// Human-readable summary.
        message: String,
        /// Records the client should refetch before retrying.
        #[serde(
            rename = "conflictingRecords",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        conflicting_records: Option<Vec<RecordPointer>>,
        /// Per-record version details.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        conflicts: Vec<VersionConflict>,
    },
}

impl WriteResponse {
    /// Creates a success response.
    pub fn success(record_map: RecordMap) -> Self {
        WriteResponse::Success { record_map }
    }

    /// Creates a conflict response from detector output.
    pub fn conflict(conflicts: Vec<VersionConflict>) -> Self {
        Self::rejected(conflicts, Vec::new())
    }

    /// Creates a conflict response for version mismatches plus records that
    /// disappeared between read and commit.
    pub fn rejected(conflicts: Vec<VersionConflict>, missing: Vec<RecordPointer>) -> Self {
        let mut message = format!(
            "{} record(s) were modified by another writer",
            conflicts.len()
        );
        if !missing.is_empty() {
            message.push_str(&format!(", {} record(s) no longer exist", missing.len()));
        }
        message.push_str("; refetch and retry");

        let mut pointers: Vec<RecordPointer> =
            conflicts.iter().map(VersionConflict::pointer).collect();
        pointers.extend(missing);

        WriteResponse::Conflict {
            message,
            conflicting_records: Some(pointers),
            conflicts,
        }
    }

    /// Returns true for a committed write.
    pub fn is_success(&self) -> bool {
        matches!(self, WriteResponse::Success { .. })
    }

    /// Returns true for a version conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, WriteResponse::Conflict { .. })
    }
}

/// Request for a batch of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRecordsRequest {
    /// Records to fetch.
    pub pointers: Vec<RecordPointer>,
}

impl GetRecordsRequest {
    /// Creates a new request.
    pub fn new(pointers: Vec<RecordPointer>) -> Self {
        Self { pointers }
    }

    /// Checks that 1 to [`MAX_POINTERS_PER_REQUEST`] valid pointers are present.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.pointers.is_empty() {
            return Err(ProtocolError::invalid_request(
                "pointers must contain at least one pointer",
            ));
        }
        if self.pointers.len() > MAX_POINTERS_PER_REQUEST {
            return Err(ProtocolError::invalid_request(format!(
                "too many pointers: {} > {}",
                self.pointers.len(),
                MAX_POINTERS_PER_REQUEST
            )));
        }
        self.pointers.iter().try_for_each(RecordPointer::validate)
    }

    /// Decodes a request from an untyped body and validates it.
    pub fn from_value(value: Value) -> ProtocolResult<Self> {
        let request: GetRecordsRequest = serde_json::from_value(value)?;
        request.validate()?;
        Ok(request)
    }
}

/// Records found for a GetRecords request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordsResponse {
    /// Whatever subset of the requested records exists.
    pub record_map: RecordMap,
}

impl GetRecordsResponse {
    /// Creates a new response.
    pub fn new(record_map: RecordMap) -> Self {
        Self { record_map }
    }
}

/// Broad category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The transaction tried to write a protected field.
    ProtectedField,
    /// The server failed.
    Internal,
}

impl ErrorCode {
    /// Returns true for failures caused by the client.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorCode::Internal)
    }
}

/// Generic error envelope returned for validation and application failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error envelope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ProtocolError> for ErrorResponse {
    fn from(err: ProtocolError) -> Self {
        ErrorResponse::new(ErrorCode::Validation, err.to_string())
    }
}
