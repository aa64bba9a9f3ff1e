//! # recsync Engine
//!
//! Applies client transactions to versioned record snapshots and detects
//! conflicting concurrent writes before they are committed.
//!
//! This crate provides:
//! - Dotted field paths with unsafe-segment rejection (`FieldPath`)
//! - List merge primitives (positional insert, value removal)
//! - The transaction applier with protected-field enforcement
//! - The version conflict detector
//!
//! ## Key Invariants
//!
//! - A record's version grows by exactly one per applied operation
//! - Protected root fields are never written
//! - A failed transaction yields no record map at all
//! - The caller's snapshot is never mutated
//!
//! The engine is synchronous and performs no I/O. Callers follow a
//! read-validate-write cycle: load a snapshot, apply, reload, check for
//! conflicts, and persist only when none are reported.
//!
//! ```
//! use recsync_engine::{check_conflicts, EngineConfig, TransactionApplier};
//! use recsync_protocol::{Operation, Record, RecordMap};
//! use serde_json::json;
//! use uuid::Uuid;
//!
//! let id = Uuid::new_v4();
//! let mut snapshot = RecordMap::new();
//! snapshot.insert("users", Record::new(id));
//!
//! let applier = TransactionApplier::new(EngineConfig::default());
//! let outcome = applier
//!     .apply(&snapshot, &[Operation::set("users", id, "name", json!("Ada"))])
//!     .unwrap();
//!
//! assert_eq!(outcome.records.get("users", &id).unwrap().version, 2);
//! assert!(check_conflicts(&snapshot, &snapshot, &outcome.modified).is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod applier;
mod clock;
mod config;
mod detector;
mod error;
mod list;
mod path;

pub use applier::{ApplyOutcome, TransactionApplier};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, ProtectedFields, DEFAULT_PROTECTED_FIELDS, SYSTEM_FIELDS};
pub use detector::check_conflicts;
pub use error::{EngineError, EngineResult};
pub use list::{deep_equal, list_insert, list_remove};
pub use path::{has_empty_segment, is_safe_segment, FieldPath};
