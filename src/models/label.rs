//! FDA structured product label, as returned by openFDA `label.json`.
//!
//! Narrative sections are lists of strings in practice, but the endpoint also
//! carries scalars (`effective_time`, `version`) and nested objects
//! (`openfda`). The record keeps the raw object so the report's label section
//! is a faithful copy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelRecord(Map<String, Value>);

impl LabelRecord {
    /// Wrap a label result. Non-object and empty results carry no label.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) if !map.is_empty() => Some(Self(map)),
            _ => None,
        }
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Section value if present and not blank.
    pub fn non_blank_section(&self, name: &str) -> Option<&Value> {
        self.section(name).filter(|v| !is_blank(v))
    }

    /// First text entry of a section: first list element, or the scalar itself.
    pub fn first_text(&self, name: &str) -> Option<String> {
        self.non_blank_section(name).map(value_text)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Null, false, zero, `""`, `[]` and `{}` carry no section content.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Text for a section value: a list yields its first element.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.first().map(scalar_text).unwrap_or_default(),
        other => scalar_text(other),
    }
}

/// Strings as-is; every other value in its JSON form.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
