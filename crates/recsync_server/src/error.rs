//! Error types for the server.

use recsync_engine::EngineError;
use recsync_protocol::{ErrorCode, ErrorResponse, ProtocolError};
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while handling a request.
///
/// Version conflicts are not errors; they are reported through
/// `WriteResponse::Conflict`.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request violated a server limit.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request failed wire validation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The transaction could not be applied.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The record store failed.
    #[error("store error: {0}")]
    Store(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest(_) | ServerError::Protocol(_) | ServerError::Engine(_)
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServerError::Store(_) | ServerError::Internal(_))
    }

    /// Returns the envelope category.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServerError::InvalidRequest(_) | ServerError::Protocol(_) => ErrorCode::Validation,
            ServerError::Engine(EngineError::RecordNotFound { .. }) => ErrorCode::NotFound,
            ServerError::Engine(EngineError::ProtectedField { .. }) => ErrorCode::ProtectedField,
            ServerError::Engine(
                EngineError::InvalidPath { .. } | EngineError::VersionOverflow { .. },
            ) => ErrorCode::Validation,
            ServerError::Store(_) | ServerError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Converts into the generic error envelope.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }
}

impl From<ServerError> for ErrorResponse {
    fn from(err: ServerError) -> Self {
        err.to_response()
    }
}
