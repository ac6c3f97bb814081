//! Decoded vendor-extension values (`x-*` keys) of a model definition.

use serde_json::Value;
use std::collections::BTreeMap;

/// Vendor extensions keyed by their full name, e.g. `x-kubernetes-list-type`.
pub type Extensions = BTreeMap<String, ExtensionValue>;

/// A dynamically-typed value decoded from a serialized document.
///
/// The narrowing accessors return `None` on a type mismatch instead of
/// failing, so callers can skip entries they do not understand.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ExtensionValue>),
    Map(BTreeMap<String, ExtensionValue>),
}

impl ExtensionValue {
    pub fn as_list(&self) -> Option<&[ExtensionValue]> {
        match self {
            ExtensionValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ExtensionValue>> {
        match self {
            ExtensionValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtensionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtensionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Entry of a map value; `None` for missing keys and non-map values.
    pub fn get(&self, key: &str) -> Option<&ExtensionValue> {
        self.as_map()?.get(key)
    }
}

impl From<Value> for ExtensionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ExtensionValue::Null,
            Value::Bool(b) => ExtensionValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ExtensionValue::Integer(i),
                None => ExtensionValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ExtensionValue::String(s),
            Value::Array(items) => {
                ExtensionValue::List(items.into_iter().map(ExtensionValue::from).collect())
            }
            Value::Object(entries) => ExtensionValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, ExtensionValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ExtensionValue {
    fn from(s: &str) -> Self {
        ExtensionValue::String(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_json() {
        let value = ExtensionValue::from(json!([
            {"group": "apps", "version": "v1", "kind": "Deployment"},
            7,
            1.5,
            null
        ]));
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].get("group").and_then(ExtensionValue::as_str), Some("apps"));
        assert_eq!(items[1], ExtensionValue::Integer(7));
        assert_eq!(items[2], ExtensionValue::Float(1.5));
        assert_eq!(items[3], ExtensionValue::Null);
    }

    #[test]
    fn narrowing_mismatch_is_none() {
        let s = ExtensionValue::from("atomic");
        assert_eq!(s.as_str(), Some("atomic"));
        assert!(s.as_list().is_none());
        assert!(s.as_map().is_none());
        assert!(s.as_bool().is_none());
        assert!(s.get("kind").is_none());

        let b = ExtensionValue::from(json!(true));
        assert_eq!(b.as_bool(), Some(true));
        assert!(b.as_str().is_none());
    }
}
