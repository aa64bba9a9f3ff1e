//! Fixture builders.
//!
//! Records are addressed by small integers that map to deterministic UUIDs,
//! so tests can write `pointer("users", 1)` instead of spelling out IDs.

use recsync_protocol::{Operation, Record, RecordMap, RecordPointer, Transaction};
use serde_json::Value;
use uuid::Uuid;

/// Author ID used by [`transaction`].
pub const TEST_AUTHOR: Uuid = Uuid::from_u128(0xA0);

/// Client timestamp used by [`transaction`].
pub const TEST_CLIENT_TIMESTAMP: u64 = 1_700_000_000_000;

/// Returns the deterministic UUID for `n`.
pub fn uuid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Returns a pointer to record `n` in `table`.
pub fn pointer(table: &str, n: u128) -> RecordPointer {
    RecordPointer::new(table, uuid(n))
}

/// Builds record `n` at `version` with the fields of a JSON object.
///
/// # Panics
///
/// Panics if `fields` is not a JSON object.
pub fn record(n: u128, version: u64, fields: Value) -> Record {
    let Value::Object(fields) = fields else {
        panic!("record fields must be a JSON object, got {fields}");
    };
    Record {
        id: uuid(n),
        version,
        fields,
    }
}

/// Builds a snapshot from `(table, record)` pairs.
pub fn record_map<'a, I>(entries: I) -> RecordMap
where
    I: IntoIterator<Item = (&'a str, Record)>,
{
    let mut map = RecordMap::new();
    for (table, record) in entries {
        map.insert(table, record);
    }
    map
}

/// Wraps operations in a transaction with a fixed author and timestamp.
pub fn transaction(operations: Vec<Operation>) -> Transaction {
    Transaction::new(TEST_AUTHOR, operations, TEST_CLIENT_TIMESTAMP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fixtures_build_expected_shapes() {
        let map = record_map([
            ("users", record(1, 5, json!({"name": "Ada"}))),
            ("posts", record(2, 1, json!({}))),
        ]);

        let user = map.get_pointer(&pointer("users", 1)).unwrap();
        assert_eq!(user.version, 5);
        assert_eq!(user.field("name"), Some(&json!("Ada")));
        assert_eq!(map.len(), 2);

        let tx = transaction(vec![Operation::set_now("posts", uuid(2), "at")]);
        assert_eq!(tx.author_id, TEST_AUTHOR);
        assert!(tx.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "JSON object")]
    fn record_rejects_non_object() {
        let _ = record(1, 1, json!([1]));
    }
}
