//! Schema form engine
//!
//! Turns a document-type schema into form state, filters keystrokes against
//! the field rules and serializes the result for the backend.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::domain::aggregates::{DocumentTypeSchema, FieldDefinition};
use crate::domain::value_objects::field_value::stored_text;
use crate::domain::value_objects::{
    normalize_flag, FieldId, FieldTypeId, FieldValue, RawValue, StoredValues, ValueKind,
};

static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]*$").expect("integer pattern is valid"));

/// How a form was opened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormMode {
    Create,
    Edit,
    View,
}

impl FormMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::View)
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit => write!(f, "edit"),
            Self::View => write!(f, "view"),
        }
    }
}

/// Values of one open form, keyed by field id
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    mode: FormMode,
    values: HashMap<FieldId, FieldValue>,
}

impl FormState {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn get(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Look a value up by display name through the schema
    pub fn get_by_name(&self, schema: &DocumentTypeSchema, name: &str) -> Option<&FieldValue> {
        schema.field_by_name(name).and_then(|f| self.values.get(&f.id))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One serialized field of a submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntry {
    pub field_id: FieldId,
    pub value: Value,
}

/// Why a value was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    ReadOnly,
    UnknownField(FieldId),
    TooLong { field: String, max: usize },
    NotAnInteger { field: String },
    TypeMismatch { field: String },
}

impl std::error::Error for Rejection {}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "Form is read-only"),
            Self::UnknownField(id) => write!(f, "Unknown field: {}", id),
            Self::TooLong { field, max } => {
                write!(f, "{} accepts at most {} characters", field, max)
            }
            Self::NotAnInteger { field } => write!(f, "{} only accepts whole numbers", field),
            Self::TypeMismatch { field } => {
                write!(f, "{} does not accept that kind of value", field)
            }
        }
    }
}

/// Form engine bound to one schema
#[derive(Clone, Copy, Debug)]
pub struct FormEngine<'a> {
    schema: &'a DocumentTypeSchema,
}

impl<'a> FormEngine<'a> {
    pub fn new(schema: &'a DocumentTypeSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a DocumentTypeSchema {
        self.schema
    }

    /// Fresh state for a newly opened form.
    ///
    /// Create mode starts blank (booleans `false`); edit and view copy the
    /// stored values, normalizing boolean-like values.
    pub fn initialize(&self, mode: FormMode, existing: Option<&StoredValues>) -> FormState {
        let values = self
            .schema
            .fields()
            .iter()
            .map(|field| {
                let kind = field.spec().value_kind;
                let stored = match mode {
                    FormMode::Create => None,
                    FormMode::Edit | FormMode::View => {
                        existing.and_then(|values| values.lookup(&field.id, &field.name))
                    }
                };
                let value = match (kind, stored) {
                    (_, None) => FieldValue::empty(kind),
                    (ValueKind::Boolean, Some(v)) => FieldValue::Boolean(normalize_flag(v)),
                    (kind, Some(v)) => FieldValue::from_text(kind, stored_text(v)),
                };
                (field.id.clone(), value)
            })
            .collect();

        FormState { mode, values }
    }

    /// Apply one keystroke-level change.
    ///
    /// On rejection the state is left untouched.
    pub fn set_field_value(
        &self,
        state: &mut FormState,
        field_id: &FieldId,
        raw: impl Into<RawValue>,
    ) -> Result<(), Rejection> {
        if state.mode.is_read_only() {
            return Err(Rejection::ReadOnly);
        }

        let field = self
            .schema
            .field(field_id)
            .ok_or_else(|| Rejection::UnknownField(field_id.clone()))?;

        let value = Self::check(field, raw.into())?;
        state.values.insert(field.id.clone(), value);
        Ok(())
    }

    fn check(field: &FieldDefinition, raw: RawValue) -> Result<FieldValue, Rejection> {
        let spec = field.spec();

        let text = match (spec.value_kind, raw) {
            (ValueKind::Boolean, RawValue::Flag(b)) => return Ok(FieldValue::Boolean(b)),
            (ValueKind::Boolean, RawValue::Text(s)) => {
                return Ok(FieldValue::from_text(ValueKind::Boolean, s))
            }
            (_, RawValue::Flag(_)) => {
                return Err(Rejection::TypeMismatch { field: field.name.clone() })
            }
            (_, RawValue::Text(s)) => s,
        };

        let chars = text.chars().count();

        if let Some(max) = field.max_length() {
            if chars > max {
                return Err(Rejection::TooLong { field: field.name.clone(), max });
            }
        }

        if field.type_id == FieldTypeId::SingleChar {
            let max = field.max_length().unwrap_or(0).max(1);
            if chars > max {
                return Err(Rejection::TooLong { field: field.name.clone(), max });
            }
        }

        if spec.is_integer_like() && !text.is_empty() && !INTEGER_PATTERN.is_match(&text) {
            return Err(Rejection::NotAnInteger { field: field.name.clone() });
        }

        Ok(FieldValue::from_text(spec.value_kind, text))
    }

    /// Backend payload: one entry per field in schema order, values verbatim
    pub fn serialize(&self, state: &FormState) -> Vec<FieldEntry> {
        self.schema
            .fields()
            .iter()
            .map(|field| FieldEntry {
                field_id: field.id.clone(),
                value: state
                    .get(&field.id)
                    .map(FieldValue::to_json)
                    .unwrap_or_else(|| FieldValue::empty(field.spec().value_kind).to_json()),
            })
            .collect()
    }

    /// Fields in display order: the document-name field first, the rest in
    /// schema order
    pub fn render_order(&self) -> Vec<&'a FieldDefinition> {
        let (mut first, rest): (Vec<_>, Vec<_>) =
            self.schema.fields().iter().partition(|f| f.is_document_name());
        first.extend(rest);
        first
    }
}
