//! # recsync Server
//!
//! Request handling for the recsync engine.
//!
//! This crate provides:
//! - Write and GetRecords handlers
//! - The read-validate-write commit cycle
//! - A `RecordStore` seam for durable storage, with an in-memory store
//! - Translation of engine failures into error envelopes
//!
//! # Write cycle
//!
//! 1. Load a snapshot of every record the transaction references
//! 2. Apply the transaction to a copy of that snapshot
//! 3. Hand the original and candidate snapshots to the store, which reloads
//!    the touched records, checks versions, and persists only if none moved
//! 4. Return the updated records, or a conflict response the client can
//!    retry from
//!
//! Transport, authentication and change fan-out are left to the embedding
//! application.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;
mod store;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use server::SyncServer;
pub use store::{CommitOutcome, MemoryRecordStore, RecordStore};
