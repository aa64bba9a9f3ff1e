//! Property-based test generators using proptest.
//!
//! Provides strategies for generating snapshots and operation batches that
//! respect the engine's input invariants: versions start at 1, tables are
//! non-empty, and generated field names never collide with system fields.

use proptest::prelude::*;
use recsync_protocol::{ListPosition, Operation, OperationKind, Record, RecordMap, RecordPointer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Table names used by generated snapshots.
pub const TABLES: [&str; 3] = ["users", "posts", "lists"];

/// Strategy for generating record IDs.
pub fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Strategy for picking one of [`TABLES`].
pub fn table_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(TABLES.to_vec()).prop_map(str::to_owned)
}

/// Strategy for generating a single path segment that is never `id` or `version`.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,7}")
        .expect("Invalid regex")
        .prop_filter("system fields are not user data", |s| {
            s != "id" && s != "version"
        })
}

/// Strategy for generating dotted field paths of one to three segments.
pub fn field_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(field_name_strategy(), 1..4).prop_map(|segments| segments.join("."))
}

/// Strategy for generating arbitrary JSON values, nested up to three levels.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        prop::string::string_regex("[a-z]{0,6}")
            .expect("Invalid regex")
            .prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Strategy for generating a record at a version in `1..1000`.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (
        uuid_strategy(),
        1u64..1000,
        prop::collection::btree_map(field_name_strategy(), json_value_strategy(), 0..5),
    )
        .prop_map(|(id, version, fields)| Record {
            id,
            version,
            fields: fields.into_iter().collect(),
        })
}

/// Strategy for generating a snapshot holding between 1 and `max_records` records.
pub fn record_map_strategy(max_records: usize) -> impl Strategy<Value = RecordMap> {
    prop::collection::vec((table_name_strategy(), record_strategy()), 1..=max_records.max(1))
        .prop_map(|entries| {
            let mut map = RecordMap::new();
            for (table, record) in entries {
                map.insert(table, record);
            }
            map
        })
}

/// Strategy for generating list positions.
pub fn list_position_strategy() -> impl Strategy<Value = ListPosition> {
    prop_oneof![
        Just(ListPosition::Prepend),
        Just(ListPosition::Append),
        json_value_strategy().prop_map(ListPosition::Before),
        json_value_strategy().prop_map(ListPosition::After),
    ]
}

/// Strategy for generating any of the four operation kinds.
pub fn operation_kind_strategy() -> impl Strategy<Value = OperationKind> {
    prop_oneof![
        3 => json_value_strategy().prop_map(|value| OperationKind::Set { value }),
        1 => Just(OperationKind::SetNow),
        2 => (json_value_strategy(), list_position_strategy())
            .prop_map(|(value, position)| OperationKind::ListInsert { value, position }),
        2 => json_value_strategy().prop_map(|value| OperationKind::ListRemove { value }),
    ]
}

/// Strategy for generating an operation against one of `pointers`.
///
/// `pointers` must not be empty.
pub fn operation_strategy(pointers: Vec<RecordPointer>) -> impl Strategy<Value = Operation> {
    (
        prop::sample::select(pointers),
        field_path_strategy(),
        operation_kind_strategy(),
    )
        .prop_map(|(pointer, key, kind)| Operation::new(pointer.table, pointer.id, key, kind))
}

/// Strategy for generating a snapshot together with a batch of 1 to `max_ops`
/// operations that only reference records present in it.
pub fn snapshot_with_operations_strategy(
    max_records: usize,
    max_ops: usize,
) -> impl Strategy<Value = (RecordMap, Vec<Operation>)> {
    record_map_strategy(max_records).prop_flat_map(move |map| {
        let pointers = map.pointers();
        let ops = prop::collection::vec(operation_strategy(pointers), 1..=max_ops.max(1));
        (Just(map), ops)
    })
}

/// How hard a property test searches for counterexamples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Budget {
    /// Small runs for generator self-checks.
    Quick,
    /// Engine invariants.
    #[default]
    Standard,
}

impl Budget {
    /// Returns the proptest configuration for this budget.
    #[must_use]
    pub fn config(self) -> ProptestConfig {
        let (cases, max_shrink_iters) = match self {
            Budget::Quick => (32, 100),
            Budget::Standard => (256, 1_000),
        };
        ProptestConfig {
            cases,
            max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
