//! # recsync Protocol
//!
//! Record, operation and message types for the recsync engine.
//!
//! This crate provides:
//! - `RecordPointer`, `Record` and `RecordMap` snapshots
//! - `Operation` for the four mutation primitives
//! - `Transaction` envelopes submitted by clients
//! - `VersionConflict` reports
//! - Write / GetRecords request and response messages
//! - Wire validation for everything above
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod conflict;
mod error;
mod messages;
mod operation;
mod record;
mod transaction;

pub use conflict::VersionConflict;
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    ErrorCode, ErrorResponse, GetRecordsRequest, GetRecordsResponse, WriteRequest, WriteResponse,
    MAX_POINTERS_PER_REQUEST,
};
pub use operation::{collect_pointers, ListPosition, Operation, OperationKind};
pub use record::{Record, RecordMap, RecordPointer};
pub use transaction::Transaction;
