//! Records and values returned by the stores
//!
//! A [`Record`] is one relational row or one graph record. Values are decoded by the
//! store adapter from the driver's native types; nothing here parses serialized text.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar, vector or nested value from a store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL or a missing graph property
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer column or property
    Int(i64),
    /// Any floating point column or property
    Float(f64),
    /// Text, and anything rendered as text by the adapter (timestamps, uuids, ...)
    Text(String),
    /// Embedding decoded by an adapter that knows the column
    Vector(Vec<f32>),
    /// Any other array, numeric or not
    List(Vec<Value>),
    /// Nested map, e.g. a graph node's properties
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Convert a JSON value; arrays keep their element types
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert back to JSON (used for query parameters and prompt rendering)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Vector(v) => serde_json::Value::Array(
                v.iter()
                    .map(|f| {
                        serde_json::Number::from_f64(*f as f64)
                            .map(serde_json::Value::Number)
                            .unwrap_or(serde_json::Value::Null)
                    })
                    .collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Read as an embedding: a vector, or a non-empty list of numbers
    pub fn as_embedding(&self) -> Option<Vec<f32>> {
        match self {
            Value::Vector(v) => Some(v.clone()),
            Value::List(items) if !items.is_empty() => items
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32))
                .collect(),
            _ => None,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Copy with the key `name` removed from every nested map
    pub fn without_field(&self, name: &str) -> Value {
        match self {
            Value::Map(map) => Value::Map(
                map.iter()
                    .filter(|(k, _)| k.as_str() != name)
                    .map(|(k, v)| (k.clone(), v.without_field(name)))
                    .collect(),
            ),
            Value::List(items) => {
                Value::List(items.iter().map(|v| v.without_field(name)).collect())
            }
            other => other.clone(),
        }
    }

    /// Render as identifier-like text: ids may come back as numbers or strings
    pub fn to_plain_string(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Vector(v) => write!(f, "<vector[{}]>", v.len()),
            Value::List(_) | Value::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::Vector(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One row or graph record: named fields in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Set a field, replacing an existing field of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style [`Record::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy without the field `name`, also removed from nested maps such as graph nodes
    pub fn without_field(&self, name: &str) -> Record {
        Record {
            fields: self
                .fields
                .iter()
                .filter(|(n, _)| n != name)
                .map(|(n, v)| (n.clone(), v.without_field(name)))
                .collect(),
        }
    }

    /// Fields as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(n, v)| (n.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// A stored embedding eligible for similarity ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Primary key of the row or node (`pyid`)
    pub id: String,
    /// Human-readable label (`pylabel`)
    pub label: Option<String>,
    /// Stored embedding
    pub embedding: Vec<f32>,
}

impl Candidate {
    /// Create a candidate
    pub fn new(id: impl Into<String>, label: Option<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            label,
            embedding,
        }
    }
}

/// A candidate that cleared the similarity threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Primary key of the row or node
    pub id: String,
    /// Human-readable label
    pub label: Option<String>,
    /// Cosine similarity against the query embedding
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numeric_array_keeps_element_types() {
        let value = Value::from_json(json!([3, 5, 0.5]));
        assert_eq!(
            value,
            Value::List(vec![Value::Int(3), Value::Int(5), Value::Float(0.5)])
        );
        assert_eq!(value.as_embedding(), Some(vec![3.0, 5.0, 0.5]));
    }

    #[test]
    fn test_as_embedding() {
        assert_eq!(Value::Vector(vec![0.5]).as_embedding(), Some(vec![0.5]));
        assert_eq!(Value::from_json(json!([])).as_embedding(), None);
        assert_eq!(Value::from_json(json!([1, "x"])).as_embedding(), None);
        assert_eq!(Value::Text("0.5".into()).as_embedding(), None);
    }

    #[test]
    fn test_from_json_mixed_array_is_list() {
        let value = Value::from_json(json!(["EPIC-1", 2]));
        assert_eq!(
            value,
            Value::List(vec![Value::Text("EPIC-1".into()), Value::Int(2)])
        );
        assert_eq!(Value::from_json(json!([])), Value::List(vec![]));
    }

    #[test]
    fn test_from_json_object_is_map() {
        let value = Value::from_json(json!({"pyid": "US-1", "points": 3}));
        let Value::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(map.get("pyid"), Some(&Value::Text("US-1".into())));
        assert_eq!(map.get("points"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record = Record::new().with("a", 1i64).with("b", "x");
        record.insert("a", 2i64);

        let columns: Vec<_> = record.columns().collect();
        assert_eq!(columns, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_record_without_field() {
        let node = Value::from_json(json!({"pyid": "E-1", "embeddings": [0.1, 0.2], "points": [3, 5]}));
        let record = Record::new()
            .with("pyid", "E-1")
            .with("embeddings", vec![0.1f32, 0.2])
            .with("points", Value::from_json(json!([3, 5, 8])))
            .with("n", node);

        let stripped = record.without_field("embeddings");
        assert!(stripped.get("embeddings").is_none());
        assert_eq!(
            stripped.to_json(),
            json!({"pyid": "E-1", "points": [3, 5, 8], "n": {"pyid": "E-1", "points": [3, 5]}})
        );
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let record = Record::new().with("z", 1i64).with("a", Value::Null);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"z":1,"a":null}"#);
    }

    #[test]
    fn test_display_hides_vector_contents() {
        assert_eq!(Value::Vector(vec![0.0; 1536]).to_string(), "<vector[1536]>");
        assert_eq!(Value::Text("done".into()).to_string(), "done");
    }
}
