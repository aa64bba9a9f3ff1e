//! Error types for the recsync protocol.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Validation errors raised while decoding or checking wire messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The body could not be decoded into the expected shape.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation is structurally invalid.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// What was wrong with the operation.
        message: String,
    },

    /// A transaction envelope is structurally invalid.
    #[error("invalid transaction: {message}")]
    InvalidTransaction {
        /// What was wrong with the transaction.
        message: String,
    },

    /// A record or request is structurally invalid.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
}

impl ProtocolError {
    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates an invalid transaction error.
    pub fn invalid_transaction(message: impl Into<String>) -> Self {
        Self::InvalidTransaction {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
