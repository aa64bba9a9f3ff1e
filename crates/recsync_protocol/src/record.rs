//! Records, record pointers and record map snapshots.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Identifies one record by `(table, id)`.
///
/// Pointers are used both as lookup keys into a [`RecordMap`] and as keys in
/// conflict reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordPointer {
    /// Table name.
    pub table: String,
    /// Record ID.
    pub id: Uuid,
}

impl RecordPointer {
    /// Creates a new pointer.
    pub fn new(table: impl Into<String>, id: Uuid) -> Self {
        Self {
            table: table.into(),
            id,
        }
    }

    /// Checks the wire constraints on a pointer.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.table.is_empty() {
            return Err(ProtocolError::invalid_request("pointer table must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for RecordPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, self.id)
    }
}

/// A versioned record.
///
/// `id` and `version` are system-managed. Every other field lives in
/// `fields` and may hold any JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record identity. Never mutated by operations.
    pub id: Uuid,
    /// Optimistic-lock token, incremented once per applied operation.
    pub version: u64,
    /// User data.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record at version 1.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 1,
            fields: Map::new(),
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Sets a top-level field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Returns a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Checks the wire constraints on a record.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.version == 0 {
            return Err(ProtocolError::invalid_request(format!(
                "record {} has version 0, versions start at 1",
                self.id
            )));
        }
        Ok(())
    }
}

/// A snapshot of records grouped by table.
///
/// This is the unit of read, apply and compare: callers always pass and
/// receive a whole map because one transaction may touch many records
/// across many tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordMap {
    tables: BTreeMap<String, BTreeMap<Uuid, Record>>,
}

impl RecordMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a record.
    pub fn get(&self, table: &str, id: &Uuid) -> Option<&Record> {
        self.tables.get(table).and_then(|records| records.get(id))
    }

    /// Returns a record for mutation.
    pub fn get_mut(&mut self, table: &str, id: &Uuid) -> Option<&mut Record> {
        self.tables
            .get_mut(table)
            .and_then(|records| records.get_mut(id))
    }

    /// Returns the record a pointer refers to.
    pub fn get_pointer(&self, pointer: &RecordPointer) -> Option<&Record> {
        self.get(&pointer.table, &pointer.id)
    }

    /// Returns true if the map holds the record a pointer refers to.
    pub fn contains(&self, pointer: &RecordPointer) -> bool {
        self.get_pointer(pointer).is_some()
    }

    /// Inserts a record under `table`, keyed by its own id.
    ///
    /// Returns the record previously stored at that position.
    pub fn insert(&mut self, table: impl Into<String>, record: Record) -> Option<Record> {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(record.id, record)
    }

    /// Removes a record.
    pub fn remove(&mut self, table: &str, id: &Uuid) -> Option<Record> {
        let records = self.tables.get_mut(table)?;
        let removed = records.remove(id);
        if records.is_empty() {
            self.tables.remove(table);
        }
        removed
    }

    /// Iterates over every `(table, record)` pair.
    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.tables.iter().flat_map(|(table, records)| {
            records.values().map(move |record| (table.as_str(), record))
        })
    }

    /// Returns a pointer for every record in the map.
    pub fn pointers(&self) -> Vec<RecordPointer> {
        self.records()
            .map(|(table, record)| RecordPointer::new(table, record.id))
            .collect()
    }

    /// Returns the total number of records.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the map holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies out the records named by `pointers`, skipping any that are absent.
    pub fn subset(&self, pointers: &[RecordPointer]) -> RecordMap {
        let mut subset = RecordMap::new();
        for pointer in pointers {
            if let Some(record) = self.get_pointer(pointer) {
                subset.insert(pointer.table.clone(), record.clone());
            }
        }
        subset
    }

    /// Checks that every record is keyed by its own id and has a valid version.
    pub fn validate(&self) -> ProtocolResult<()> {
        for (table, records) in &self.tables {
            if table.is_empty() {
                return Err(ProtocolError::invalid_request("table name must not be empty"));
            }
            for (id, record) in records {
                if *id != record.id {
                    return Err(ProtocolError::invalid_request(format!(
                        "record stored under {table}/{id} carries id {}",
                        record.id
                    )));
                }
                record.validate()?;
            }
        }
        Ok(())
    }
}
