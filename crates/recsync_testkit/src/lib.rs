//! # recsync Testkit
//!
//! Test utilities for recsync.
//!
//! This crate provides:
//! - Fixture builders for records, snapshots and transactions
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use recsync_testkit::prelude::*;
//! use serde_json::json;
//!
//! let snapshot = record_map([("users", record(1, 5, json!({"name": "Ada"})))]);
//! assert!(snapshot.contains(&pointer("users", 1)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
