//! Dotted field paths.

use serde_json::{Map, Value};

/// Segments that must never be used as object keys.
///
/// Records are handed to JavaScript clients, where writing these keys would
/// reach the object prototype.
const UNSAFE_SEGMENTS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Returns true if `segment` may be used as an object key.
pub fn is_safe_segment(segment: &str) -> bool {
    !UNSAFE_SEGMENTS.contains(&segment)
}

/// Returns true if `key` has an empty segment, as in `a..b`, `a.` or `.a`.
pub fn has_empty_segment(key: &str) -> bool {
    key.split('.').any(str::is_empty)
}

/// A validated, dot-separated path into a record's fields.
///
/// Paths are walked segment by segment through nested JSON objects; no
/// segment is ever empty or unsafe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses `key`, returning `None` if any segment is empty or unsafe.
    pub fn parse(key: &str) -> Option<Self> {
        let segments: Vec<String> = key.split('.').map(str::to_owned).collect();
        if segments.iter().all(|s| !s.is_empty() && is_safe_segment(s)) {
            Some(Self { segments })
        } else {
            None
        }
    }

    /// Returns the segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the first segment.
    pub fn root(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or_default()
    }

    /// Reads the value at this path.
    ///
    /// Returns `None` if any segment is missing or an intermediate value is
    /// not an object.
    pub fn get<'a>(&self, fields: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = fields.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Reads the value at this path for mutation.
    pub fn get_mut<'a>(&self, fields: &'a mut Map<String, Value>) -> Option<&'a mut Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = fields.get_mut(first)?;
        for segment in rest {
            current = current.as_object_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    /// Writes `value` at this path.
    ///
    /// Intermediate segments that are absent, null, or not objects are
    /// replaced with empty objects.
    pub fn set(&self, fields: &mut Map<String, Value>, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut current = fields;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot.as_object_mut() {
                Some(map) => map,
                None => return,
            };
        }
        current.insert(last.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn parse_segments() {
        let path = FieldPath::parse("settings.theme.color").unwrap();
        assert_eq!(path.segments(), ["settings", "theme", "color"]);
        assert_eq!(path.root(), "settings");

        let single = FieldPath::parse("name").unwrap();
        assert_eq!(single.segments(), ["name"]);
    }

    #[test]
    fn parse_rejects_unsafe_segments() {
        assert!(FieldPath::parse("__proto__").is_none());
        assert!(FieldPath::parse("settings.__proto__.polluted").is_none());
        assert!(FieldPath::parse("a.constructor.prototype").is_none());
        assert!(FieldPath::parse("").is_none());
        assert!(FieldPath::parse("a..b").is_none());
        assert!(FieldPath::parse("a.").is_none());
    }

    #[test]
    fn empty_segments() {
        assert!(has_empty_segment(""));
        assert!(has_empty_segment("a..b"));
        assert!(has_empty_segment("meta."));
        assert!(has_empty_segment(".x"));
        assert!(!has_empty_segment("settings.theme"));
        assert!(is_safe_segment("theme"));
        assert!(!is_safe_segment("constructor"));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut map = Map::new();
        FieldPath::parse("settings.theme.color")
            .unwrap()
            .set(&mut map, json!("dark"));
        assert_eq!(
            Value::Object(map),
            json!({"settings": {"theme": {"color": "dark"}}})
        );
    }

    #[test]
    fn set_replaces_non_object_intermediates() {
        let mut map = fields(json!({"a": null, "b": 5, "c": [1, 2]}));
        FieldPath::parse("a.x").unwrap().set(&mut map, json!(1));
        FieldPath::parse("b.x").unwrap().set(&mut map, json!(2));
        FieldPath::parse("c.x").unwrap().set(&mut map, json!(3));
        assert_eq!(
            Value::Object(map),
            json!({"a": {"x": 1}, "b": {"x": 2}, "c": {"x": 3}})
        );
    }

    #[test]
    fn set_preserves_siblings() {
        let mut map = fields(json!({"settings": {"lang": "en", "theme": {"font": "mono"}}}));
        FieldPath::parse("settings.theme.color")
            .unwrap()
            .set(&mut map, json!("dark"));
        assert_eq!(
            Value::Object(map),
            json!({"settings": {"lang": "en", "theme": {"font": "mono", "color": "dark"}}})
        );
    }

    #[test]
    fn get_walks_objects_only() {
        let map = fields(json!({"a": {"b": {"c": 1}}, "list": [1, 2]}));
        assert_eq!(FieldPath::parse("a.b.c").unwrap().get(&map), Some(&json!(1)));
        assert_eq!(
            FieldPath::parse("a.b").unwrap().get(&map),
            Some(&json!({"c": 1}))
        );
        assert_eq!(FieldPath::parse("a.x.c").unwrap().get(&map), None);
        assert_eq!(FieldPath::parse("list.0").unwrap().get(&map), None);
        assert_eq!(FieldPath::parse("missing").unwrap().get(&map), None);
    }

    #[test]
    fn get_mut_allows_in_place_edit() {
        let mut map = fields(json!({"a": {"n": 1}}));
        if let Some(value) = FieldPath::parse("a.n").unwrap().get_mut(&mut map) {
            *value = json!(2);
        }
        assert_eq!(Value::Object(map), json!({"a": {"n": 2}}));
    }
}
