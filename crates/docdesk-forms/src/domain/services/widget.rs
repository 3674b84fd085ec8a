//! Native widget semantics
//!
//! Checks an input widget performs on its own: required markers, number and
//! date formats, select membership. The form engine never calls these; the
//! surface rendering the widgets does.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::domain::aggregates::{DocumentTypeSchema, FieldDefinition};
use crate::domain::services::form_engine::{FormEngine, FormState};
use crate::domain::value_objects::{FieldValue, InputKind};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    Required { field: String },
    InvalidNumber { field: String, value: String },
    TooManyDecimals { field: String, precision: u32 },
    InvalidDate { field: String, value: String },
    NotAnOption { field: String, value: String },
}

impl std::error::Error for WidgetError {}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::InvalidNumber { field, value } => {
                write!(f, "{}: '{}' is not a number", field, value)
            }
            Self::TooManyDecimals { field, precision } => {
                write!(f, "{} allows at most {} decimal places", field, precision)
            }
            Self::InvalidDate { field, value } => {
                write!(f, "{}: '{}' is not a date (YYYY-MM-DD)", field, value)
            }
            Self::NotAnOption { field, value } => {
                write!(f, "{}: '{}' is not one of the options", field, value)
            }
        }
    }
}

/// Format check the field's widget applies to a value
pub fn validate_format(field: &FieldDefinition, value: &FieldValue) -> Result<(), WidgetError> {
    let Some(text) = value.as_text() else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }

    let spec = field.spec();
    match spec.input_kind {
        InputKind::IntegerNumber | InputKind::DecimalNumber => {
            let number = Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .map_err(|_| WidgetError::InvalidNumber {
                    field: field.name.clone(),
                    value: text.to_string(),
                })?;
            if number.normalize().scale() > spec.precision {
                return Err(WidgetError::TooManyDecimals {
                    field: field.name.clone(),
                    precision: spec.precision,
                });
            }
        }
        InputKind::Date => {
            NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| WidgetError::InvalidDate {
                field: field.name.clone(),
                value: text.to_string(),
            })?;
        }
        InputKind::Select => {
            if !field.option_values().any(|o| o == text) {
                return Err(WidgetError::NotAnOption {
                    field: field.name.clone(),
                    value: text.to_string(),
                });
            }
        }
        InputKind::ShortText
        | InputKind::LongText
        | InputKind::SingleChar
        | InputKind::Checkbox => {}
    }
    Ok(())
}

/// Required semantics: text must be non-empty, a required checkbox checked
pub fn is_missing(field: &FieldDefinition, value: Option<&FieldValue>) -> bool {
    if !field.is_required {
        return false;
    }
    match value {
        None => true,
        Some(FieldValue::Boolean(checked)) => !checked,
        Some(other) => other.as_text().map(str::is_empty).unwrap_or(true),
    }
}

/// Everything the widgets would block a submit on, in render order
pub fn check_form(schema: &DocumentTypeSchema, state: &FormState) -> Vec<WidgetError> {
    FormEngine::new(schema)
        .render_order()
        .into_iter()
        .filter_map(|field| {
            let value = state.get(&field.id);
            if is_missing(field, value) {
                return Some(WidgetError::Required { field: field.name.clone() });
            }
            value.and_then(|v| validate_format(field, v).err())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::form_engine::FormMode;
    use crate::domain::value_objects::{FieldId, FieldTypeId};

    fn field(type_id: FieldTypeId) -> FieldDefinition {
        FieldDefinition::new("1", "Field", type_id)
    }

    #[test]
    fn test_decimal_widget() {
        let f = field(FieldTypeId::Decimal);
        assert!(validate_format(&f, &FieldValue::Number("10.25".into())).is_ok());
        assert!(validate_format(&f, &FieldValue::Number("10.250".into())).is_ok());
        assert!(validate_format(&f, &FieldValue::Number("1e3".into())).is_ok());
        assert!(matches!(
            validate_format(&f, &FieldValue::Number("10.255".into())),
            Err(WidgetError::TooManyDecimals { precision: 2, .. })
        ));
        assert!(matches!(
            validate_format(&f, &FieldValue::Number("abc".into())),
            Err(WidgetError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_date_widget() {
        let f = field(FieldTypeId::Date);
        assert!(validate_format(&f, &FieldValue::Date("2024-02-29".into())).is_ok());
        assert!(validate_format(&f, &FieldValue::Date("2023-02-29".into())).is_err());
    }

    #[test]
    fn test_select_widget() {
        let f = field(FieldTypeId::Enumeration).with_options(["Red", "Green"]);
        assert!(validate_format(&f, &FieldValue::Text("Green".into())).is_ok());
        assert!(validate_format(&f, &FieldValue::Text("".into())).is_ok());
        assert!(validate_format(&f, &FieldValue::Text("Blue".into())).is_err());
    }

    #[test]
    fn test_required_fields_block() {
        let schema = DocumentTypeSchema::new(
            "1",
            "T",
            vec![
                FieldDefinition::new("a", "Title", FieldTypeId::ShortText).required(),
                FieldDefinition::new("b", "Agreed", FieldTypeId::Boolean).required(),
                FieldDefinition::new("c", "Notes", FieldTypeId::LongText),
            ],
        );
        let engine = FormEngine::new(&schema);
        let mut state = engine.initialize(FormMode::Create, None);
        assert_eq!(check_form(&schema, &state).len(), 2);

        engine.set_field_value(&mut state, &FieldId::new("a"), "Lease").unwrap();
        engine.set_field_value(&mut state, &FieldId::new("b"), true).unwrap();
        assert!(check_form(&schema, &state).is_empty());
    }
}
