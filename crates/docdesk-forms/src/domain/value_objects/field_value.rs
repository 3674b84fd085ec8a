//! Form values
//!
//! Tagged values held in form state and the raw inputs that produce them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{FieldId, ValueKind};

/// Current value of one field in an open form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "raw", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    Number(String),
    Date(String),
    Boolean(bool),
}

impl FieldValue {
    /// Blank value for a field of the given kind
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Text => Self::Text(String::new()),
            ValueKind::Number => Self::Number(String::new()),
            ValueKind::Date => Self::Date(String::new()),
            ValueKind::Boolean => Self::Boolean(false),
        }
    }

    /// Build a value of the given kind from its textual form
    pub fn from_text(kind: ValueKind, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match kind {
            ValueKind::Text => Self::Text(raw),
            ValueKind::Number => Self::Number(raw),
            ValueKind::Date => Self::Date(raw),
            ValueKind::Boolean => Self::Boolean(normalize_flag_str(&raw)),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Date(_) => ValueKind::Date,
            Self::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Textual form, `None` for booleans
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Number(s) | Self::Date(s) => Some(s),
            Self::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Boolean(_) => false,
            other => other.as_text().map(|s| s.trim().is_empty()).unwrap_or(true),
        }
    }

    /// JSON value sent to the backend, taken verbatim
    pub fn to_json(&self) -> Value {
        match self {
            Self::Boolean(b) => Value::Bool(*b),
            Self::Text(s) | Self::Number(s) | Self::Date(s) => Value::String(s.clone()),
        }
    }

    /// Human-readable rendering for view mode
    pub fn display(&self) -> String {
        match self {
            Self::Boolean(true) => "yes".into(),
            Self::Boolean(false) => "no".into(),
            Self::Text(s) | Self::Number(s) | Self::Date(s) => s.clone(),
        }
    }
}

/// Input handed to the engine by a widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// Boolean-like stored values: `1`, `"1"`, `true` and `"true"` are true.
pub fn normalize_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1) || n.as_f64() == Some(1.0),
        Value::String(s) => normalize_flag_str(s),
        _ => false,
    }
}

fn normalize_flag_str(s: &str) -> bool {
    let s = s.trim();
    s == "1" || s.eq_ignore_ascii_case("true")
}

/// Values stored with a document, keyed by field id or field name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredValues(HashMap<String, Value>);

impl StoredValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Look a field up by id first, then by name
    pub fn lookup(&self, id: &FieldId, name: &str) -> Option<&Value> {
        self.0.get(id.as_str()).or_else(|| self.0.get(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for StoredValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Textual form of a stored JSON value
pub(crate) fn stored_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
