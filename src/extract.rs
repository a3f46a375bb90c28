//! Dotted-path field extraction from JSON content.
//!
//! A path such as `address.geo.lat` or `0.title` is split on `.` and walked
//! from the root. Object segments are looked up literally; a segment made
//! only of ASCII digits indexes into an array. Anything else stops the walk.

use serde_json::Value;
use std::fmt;

/// Result type for path resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Reasons a dotted path could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Object has no such key
    MissingKey { path: String, segment: String },
    /// Array index past the end (or too large to represent)
    IndexOutOfRange { path: String, segment: String, len: usize },
    /// Segment does not fit the value it was applied to
    TypeMismatch { path: String, segment: String, found: &'static str },
    /// Walk reached a JSON `null`
    NullValue { path: String, segment: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::MissingKey { path, segment } => {
                write!(f, "'{}': no key '{}'", path, segment)
            }
            ResolveError::IndexOutOfRange { path, segment, len } => {
                write!(f, "'{}': index {} out of range (len {})", path, segment, len)
            }
            ResolveError::TypeMismatch { path, segment, found } => {
                write!(f, "'{}': cannot apply '{}' to {}", path, segment, found)
            }
            ResolveError::NullValue { path, segment } => {
                write!(f, "'{}': null at '{}'", path, segment)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// A parsed dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedPath<'a> {
    raw: &'a str,
}

impl<'a> DottedPath<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.raw.split('.')
    }

    /// Walk `content` along this path.
    pub fn resolve<'v>(&self, content: &'v Value) -> ResolveResult<&'v Value> {
        let mut current = content;
        let mut last = "";

        for segment in self.segments() {
            last = segment;
            current = match current {
                Value::Object(map) => map.get(segment).ok_or_else(|| ResolveError::MissingKey {
                    path: self.raw.to_string(),
                    segment: segment.to_string(),
                })?,
                Value::Array(items) if is_index(segment) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i))
                    .ok_or_else(|| ResolveError::IndexOutOfRange {
                        path: self.raw.to_string(),
                        segment: segment.to_string(),
                        len: items.len(),
                    })?,
                Value::Null => break,
                other => {
                    return Err(ResolveError::TypeMismatch {
                        path: self.raw.to_string(),
                        segment: segment.to_string(),
                        found: kind(other),
                    });
                }
            };

            if current.is_null() {
                break;
            }
        }

        if current.is_null() {
            return Err(ResolveError::NullValue {
                path: self.raw.to_string(),
                segment: last.to_string(),
            });
        }

        Ok(current)
    }
}

/// Resolve `path` against `content`.
pub fn resolve<'v>(content: &'v Value, path: &str) -> ResolveResult<&'v Value> {
    DottedPath::new(path).resolve(content)
}

/// Resolve `path`, mapping any failure to `None`.
pub fn lookup(content: &Value, path: &str) -> Option<Value> {
    resolve(content, path).ok().cloned()
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_nested_object_and_index() {
        let content = json!({"a": {"b": [{"c": 42}]}});
        assert_eq!(resolve(&content, "a.b.0.c"), Ok(&json!(42)));
    }

    #[test]
    fn test_leading_index_into_list() {
        let content = json!([{"title": "first"}, {"title": "second"}]);
        assert_eq!(lookup(&content, "1.title"), Some(json!("second")));
    }

    #[test]
    fn test_missing_key() {
        let content = json!({"x": {}});
        assert_eq!(
            resolve(&content, "x.y"),
            Err(ResolveError::MissingKey {
                path: "x.y".into(),
                segment: "y".into()
            })
        );
        assert_eq!(lookup(&content, "x.y"), None);
    }

    #[test]
    fn test_index_out_of_range() {
        let content = json!({"items": [1, 2]});
        assert!(matches!(
            resolve(&content, "items.5"),
            Err(ResolveError::IndexOutOfRange { len: 2, .. })
        ));
        assert!(matches!(
            resolve(&content, "items.99999999999999999999999"),
            Err(ResolveError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_numeric_segment_on_array() {
        let content = json!({"items": [1, 2]});
        assert!(matches!(
            resolve(&content, "items.first"),
            Err(ResolveError::TypeMismatch { found: "an array", .. })
        ));
        assert!(matches!(
            resolve(&content, "items.-1"),
            Err(ResolveError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_descending_into_scalar() {
        let content = json!({"name": "Leia"});
        assert!(matches!(
            resolve(&content, "name.first"),
            Err(ResolveError::TypeMismatch { found: "a string", .. })
        ));
        assert_eq!(lookup(&json!("plain text"), "response"), None);
    }

    #[test]
    fn test_null_stops_the_walk() {
        let content = json!({"a": null, "b": {"c": null}});
        assert!(matches!(
            resolve(&content, "a.deeper.still"),
            Err(ResolveError::NullValue { .. })
        ));
        assert!(matches!(
            resolve(&content, "b.c"),
            Err(ResolveError::NullValue { .. })
        ));
    }

    #[test]
    fn test_falsy_values_resolve() {
        let content = json!({"zero": 0, "empty": "", "no": false, "list": []});
        assert_eq!(lookup(&content, "zero"), Some(json!(0)));
        assert_eq!(lookup(&content, "empty"), Some(json!("")));
        assert_eq!(lookup(&content, "no"), Some(json!(false)));
        assert_eq!(lookup(&content, "list"), Some(json!([])));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let content = json!({"address": {"geo": {"lat": "-37.3159"}}});
        let before = content.clone();
        let first = lookup(&content, "address.geo.lat");
        let second = lookup(&content, "address.geo.lat");
        assert_eq!(first, second);
        assert_eq!(content, before);
    }

    #[test]
    fn test_digit_keys_on_objects_are_literal() {
        let content = json!({"0": "zero"});
        assert_eq!(lookup(&content, "0"), Some(json!("zero")));
    }

    #[test]
    fn test_segments() {
        let path = DottedPath::new("a.b.0");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "0"]);
        assert_eq!(path.as_str(), "a.b.0");
    }

    #[test]
    fn test_error_display() {
        let err = ResolveError::MissingKey {
            path: "x.y".into(),
            segment: "y".into(),
        };
        assert_eq!(err.to_string(), "'x.y': no key 'y'");
    }
}
