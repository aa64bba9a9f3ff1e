//! List merge primitives.

use crate::path::FieldPath;
use recsync_protocol::ListPosition;
use serde_json::{Map, Value};

/// Structural equality over JSON values.
///
/// Objects and arrays compare by contents. Numbers compare by numeric value,
/// so `1` and `1.0` are equal.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}

fn position_of(items: &[Value], pivot: &Value) -> Option<usize> {
    items.iter().position(|item| deep_equal(item, pivot))
}

/// Inserts `value` into the list at `path`.
///
/// A missing or non-list value is treated as an empty list. Any element equal
/// to `value` is removed first, so re-inserting moves rather than duplicates.
/// Pivots match their first equal element; a missing `Before` pivot inserts at
/// the front, and a missing `After` pivot also inserts at the front.
pub fn list_insert(
    fields: &mut Map<String, Value>,
    path: &FieldPath,
    value: Value,
    position: &ListPosition,
) {
    let mut items: Vec<Value> = match path.get(fields) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !deep_equal(item, &value))
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    let index = match position {
        ListPosition::Prepend => 0,
        ListPosition::Append => items.len(),
        ListPosition::Before(pivot) => position_of(&items, pivot).unwrap_or(0),
        ListPosition::After(pivot) => position_of(&items, pivot).map_or(0, |i| i + 1),
    };
    items.insert(index, value);

    path.set(fields, Value::Array(items));
}

/// Removes every element equal to `value` from the list at `path`.
///
/// Does nothing when the path does not hold a list.
pub fn list_remove(fields: &mut Map<String, Value>, path: &FieldPath, value: &Value) {
    if let Some(Value::Array(items)) = path.get_mut(fields) {
        items.retain(|item| !deep_equal(item, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items_after(initial: Value, value: Value, position: ListPosition) -> Value {
        let mut fields = Map::new();
        fields.insert("items".into(), initial);
        let path = FieldPath::parse("items").unwrap();
        list_insert(&mut fields, &path, value, &position);
        fields.remove("items").unwrap()
    }

    #[test]
    fn deep_equal_is_structural() {
        assert!(deep_equal(&json!({"a": [1, {"b": 2}]}), &json!({"a": [1, {"b": 2}]})));
        assert!(!deep_equal(&json!({"a": [1, {"b": 2}]}), &json!({"a": [1, {"b": 3}]})));
        assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 1})));
        assert!(deep_equal(&json!(1), &json!(1.0)));
        assert!(!deep_equal(&json!("1"), &json!(1)));
        assert!(deep_equal(&json!(null), &json!(null)));
    }

    #[test]
    fn prepend_and_append() {
        assert_eq!(
            items_after(json!(["a", "b"]), json!("c"), ListPosition::Prepend),
            json!(["c", "a", "b"])
        );
        assert_eq!(
            items_after(json!(["a", "b"]), json!("c"), ListPosition::Append),
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn before_and_after_pivot() {
        assert_eq!(
            items_after(json!(["a", "c"]), json!("b"), ListPosition::Before(json!("c"))),
            json!(["a", "b", "c"])
        );
        assert_eq!(
            items_after(json!(["a", "c"]), json!("b"), ListPosition::After(json!("a"))),
            json!(["a", "b", "c"])
        );
        assert_eq!(
            items_after(json!(["a", "c"]), json!("b"), ListPosition::After(json!("c"))),
            json!(["a", "c", "b"])
        );
    }

    #[test]
    fn missing_pivot_inserts_at_front() {
        assert_eq!(
            items_after(json!(["a", "c"]), json!("b"), ListPosition::After(json!("z"))),
            json!(["b", "a", "c"])
        );
        assert_eq!(
            items_after(json!(["a", "c"]), json!("b"), ListPosition::Before(json!("z"))),
            json!(["b", "a", "c"])
        );
    }

    #[test]
    fn pivot_uses_first_match() {
        assert_eq!(
            items_after(
                json!(["x", "a", "x"]),
                json!("b"),
                ListPosition::After(json!("x"))
            ),
            json!(["x", "b", "a", "x"])
        );
    }

    #[test]
    fn reinsert_moves_without_duplicating() {
        let result = items_after(json!(["a", "b", "c"]), json!("a"), ListPosition::Append);
        assert_eq!(result, json!(["b", "c", "a"]));

        let result = items_after(
            json!([{"id": 1}, {"id": 2}]),
            json!({"id": 2}),
            ListPosition::Prepend,
        );
        assert_eq!(result, json!([{"id": 2}, {"id": 1}]));
    }

    #[test]
    fn non_list_is_treated_as_empty() {
        assert_eq!(
            items_after(json!("scalar"), json!(1), ListPosition::Append),
            json!([1])
        );
        assert_eq!(
            items_after(json!(null), json!(1), ListPosition::After(json!(0))),
            json!([1])
        );
    }

    #[test]
    fn insert_into_missing_nested_list() {
        let mut fields = Map::new();
        let path = FieldPath::parse("meta.tags").unwrap();
        list_insert(&mut fields, &path, json!("rust"), &ListPosition::Append);
        assert_eq!(Value::Object(fields), json!({"meta": {"tags": ["rust"]}}));
    }

    #[test]
    fn remove_all_matches() {
        let mut fields = Map::new();
        fields.insert("items".into(), json!([1, [2], 1, {"a": 1}, 1.0]));
        let path = FieldPath::parse("items").unwrap();

        list_remove(&mut fields, &path, &json!(1));
        assert_eq!(fields["items"], json!([[2], {"a": 1}]));

        list_remove(&mut fields, &path, &json!({"a": 1}));
        assert_eq!(fields["items"], json!([[2]]));
    }

    #[test]
    fn remove_is_noop_on_absent_value_or_non_list() {
        let mut fields = Map::new();
        fields.insert("items".into(), json!(["a"]));
        fields.insert("title".into(), json!("hello"));

        list_remove(&mut fields, &FieldPath::parse("items").unwrap(), &json!("z"));
        list_remove(&mut fields, &FieldPath::parse("title").unwrap(), &json!("hello"));
        list_remove(&mut fields, &FieldPath::parse("missing.list").unwrap(), &json!(1));

        assert_eq!(
            Value::Object(fields),
            json!({"items": ["a"], "title": "hello"})
        );
    }
}
