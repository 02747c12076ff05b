//! Schema-less upstream records and the locators that link them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{HolonetError, Result};

/// Reference to an upstream resource: an absolute URL or a path relative
/// to the configured base address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the locator carries its own scheme and host.
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Locator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The locator(s) held by a relation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    One(Locator),
    Many(Vec<Locator>),
}

/// An upstream resource representation.
///
/// Field order follows the upstream payload. Records are treated as
/// immutable once fetched: enrichment clones a record and replaces relation
/// fields on the copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a decoded JSON payload.
    ///
    /// Anything other than a JSON object is a malformed upstream payload.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(HolonetError::upstream(format!(
                "malformed upstream payload: expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of a field, if it holds one.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Insert (or overwrite) a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read a relation field.
    ///
    /// Returns `None` when the field is absent, null, an empty string, an
    /// empty list, or anything that is not a locator or a list of locators
    /// (e.g. a field that was already resolved into a record).
    pub fn relation(&self, field: &str) -> Option<Relation> {
        match self.0.get(field)? {
            Value::String(s) if !s.is_empty() => Some(Relation::One(Locator::new(s.clone()))),
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| item.as_str().map(Locator::from))
                .collect::<Option<Vec<_>>>()
                .map(Relation::Many),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
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
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let err = Record::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn relation_single_locator() {
        let r = record(json!({"homeworld": "planets/1/"}));
        assert_eq!(
            r.relation("homeworld"),
            Some(Relation::One(Locator::from("planets/1/")))
        );
    }

    #[test]
    fn relation_locator_list() {
        let r = record(json!({"films": ["films/1/", "films/2/"]}));
        assert_eq!(
            r.relation("films"),
            Some(Relation::Many(vec![
                Locator::from("films/1/"),
                Locator::from("films/2/")
            ]))
        );
    }

    #[test]
    fn relation_absent_null_or_empty_is_none() {
        let r = record(json!({"a": null, "b": "", "c": [], "d": {"name": "x"}}));
        assert!(r.relation("missing").is_none());
        assert!(r.relation("a").is_none());
        assert!(r.relation("b").is_none());
        assert!(r.relation("c").is_none());
        assert!(r.relation("d").is_none());
    }

    #[test]
    fn relation_mixed_list_is_none() {
        let r = record(json!({"films": ["films/1/", {"title": "A New Hope"}]}));
        assert!(r.relation("films").is_none());
    }

    #[test]
    fn locator_absoluteness() {
        assert!(Locator::from("https://swapi.dev/api/people/1/").is_absolute());
        assert!(Locator::from("http://localhost/people/1/").is_absolute());
        assert!(!Locator::from("people/1/").is_absolute());
    }

    #[test]
    fn field_order_is_preserved() {
        let r = record(json!({"name": "Luke", "height": "172", "gender": "male"}));
        let fields: Vec<_> = r.fields().collect();
        assert_eq!(fields, vec!["name", "height", "gender"]);
    }
}
