//! Field types and the registry that maps them to input widgets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared data type of a schema field
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldTypeId {
    ShortText,
    LongText,
    Integer,
    Decimal,
    Currency,
    Date,
    SingleChar,
    Boolean,
    Enumeration,
    /// Backend code this client does not know; rendered as short text.
    Unrecognized(String),
}

impl FieldTypeId {
    pub const ALL: [FieldTypeId; 9] = [
        FieldTypeId::ShortText,
        FieldTypeId::LongText,
        FieldTypeId::Integer,
        FieldTypeId::Decimal,
        FieldTypeId::Currency,
        FieldTypeId::Date,
        FieldTypeId::SingleChar,
        FieldTypeId::Boolean,
        FieldTypeId::Enumeration,
    ];

    /// Parse a backend type code.
    ///
    /// Accepts canonical names, numeric ids and the backend's Spanish labels.
    pub fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_lowercase();
        match normalized.as_str() {
            "shorttext" | "short_text" | "text" | "1" | "texto corto" | "texto" => Self::ShortText,
            "longtext" | "long_text" | "2" | "texto largo" => Self::LongText,
            "integer" | "int" | "3" | "entero" => Self::Integer,
            "decimal" | "4" => Self::Decimal,
            "currency" | "money" | "5" | "moneda" => Self::Currency,
            "date" | "6" | "fecha" => Self::Date,
            "singlechar" | "single_char" | "char" | "7" | "caracter" | "carácter" => {
                Self::SingleChar
            }
            "boolean" | "bool" | "8" | "booleano" => Self::Boolean,
            "enumeration" | "enum" | "specificvalues" | "specific_values" | "9"
            | "valores especificos" | "valores específicos" => Self::Enumeration,
            _ => Self::Unrecognized(code.trim().to_string()),
        }
    }

    /// Code sent back to the backend
    pub fn code(&self) -> &str {
        match self {
            Self::ShortText => "shortText",
            Self::LongText => "longText",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::SingleChar => "singleChar",
            Self::Boolean => "boolean",
            Self::Enumeration => "enumeration",
            Self::Unrecognized(code) => code,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    pub fn is_enumeration(&self) -> bool {
        matches!(self, Self::Enumeration)
    }
}

impl From<String> for FieldTypeId {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<FieldTypeId> for String {
    fn from(id: FieldTypeId) -> Self {
        id.code().to_string()
    }
}

impl fmt::Display for FieldTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Input widget used to edit a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    ShortText,
    LongText,
    IntegerNumber,
    DecimalNumber,
    Date,
    SingleChar,
    Checkbox,
    Select,
}

impl InputKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::IntegerNumber | Self::DecimalNumber)
    }
}

/// Tag of the value a field holds in form state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    Date,
}

/// What the registry knows about a field type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldTypeSpec {
    pub input_kind: InputKind,
    /// Default decimal places; 0 means integer-like for numeric kinds
    pub precision: u32,
    pub value_kind: ValueKind,
}

impl FieldTypeSpec {
    const fn new(input_kind: InputKind, precision: u32, value_kind: ValueKind) -> Self {
        Self { input_kind, precision, value_kind }
    }

    /// True for numeric widgets that only take whole numbers
    pub fn is_integer_like(&self) -> bool {
        self.input_kind.is_numeric() && self.precision == 0
    }
}

/// Static mapping from field type to widget, precision and value kind
pub struct FieldTypeRegistry;

impl FieldTypeRegistry {
    pub const DEFAULT_DECIMAL_PRECISION: u32 = 2;

    /// Resolve a type id. Unrecognized types fall back to short text.
    pub fn resolve(type_id: &FieldTypeId) -> FieldTypeSpec {
        use InputKind as K;
        use ValueKind as V;

        match type_id {
            FieldTypeId::ShortText => FieldTypeSpec::new(K::ShortText, 0, V::Text),
            FieldTypeId::LongText => FieldTypeSpec::new(K::LongText, 0, V::Text),
            FieldTypeId::Integer => FieldTypeSpec::new(K::IntegerNumber, 0, V::Number),
            FieldTypeId::Decimal | FieldTypeId::Currency => {
                FieldTypeSpec::new(K::DecimalNumber, Self::DEFAULT_DECIMAL_PRECISION, V::Number)
            }
            FieldTypeId::Date => FieldTypeSpec::new(K::Date, 0, V::Date),
            FieldTypeId::SingleChar => FieldTypeSpec::new(K::SingleChar, 0, V::Text),
            FieldTypeId::Boolean => FieldTypeSpec::new(K::Checkbox, 0, V::Boolean),
            FieldTypeId::Enumeration => FieldTypeSpec::new(K::Select, 0, V::Text),
            FieldTypeId::Unrecognized(_) => FieldTypeSpec::new(K::ShortText, 0, V::Text),
        }
    }

    /// Resolve a type id with a field's own precision applied.
    ///
    /// A decimal field declared with precision 0 behaves as an integer input.
    pub fn resolve_with_precision(type_id: &FieldTypeId, precision: Option<u32>) -> FieldTypeSpec {
        let mut spec = Self::resolve(type_id);
        if spec.input_kind == InputKind::DecimalNumber {
            if let Some(precision) = precision {
                spec.precision = precision;
                if precision == 0 {
                    spec.input_kind = InputKind::IntegerNumber;
                }
            }
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_total() {
        for type_id in FieldTypeId::ALL {
            let spec = FieldTypeRegistry::resolve(&type_id);
            if type_id.is_boolean() {
                assert_eq!(spec.input_kind, InputKind::Checkbox);
            }
        }
    }

    #[test]
    fn test_unrecognized_falls_back_to_short_text() {
        let type_id = FieldTypeId::from_code("signature");
        assert_eq!(type_id, FieldTypeId::Unrecognized("signature".into()));
        assert_eq!(FieldTypeRegistry::resolve(&type_id).input_kind, InputKind::ShortText);
    }

    #[test]
    fn test_code_aliases() {
        assert_eq!(FieldTypeId::from_code("3"), FieldTypeId::Integer);
        assert_eq!(FieldTypeId::from_code("Moneda"), FieldTypeId::Currency);
        assert_eq!(FieldTypeId::from_code(" singleChar "), FieldTypeId::SingleChar);
        assert_eq!(FieldTypeId::from_code("valores especificos"), FieldTypeId::Enumeration);
    }

    #[test]
    fn test_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&FieldTypeId::Currency).unwrap();
        assert_eq!(json, "\"currency\"");
        let back: FieldTypeId = serde_json::from_str("\"custom-x\"").unwrap();
        assert_eq!(back.code(), "custom-x");
    }

    #[test]
    fn test_decimal_precision() {
        let spec = FieldTypeRegistry::resolve(&FieldTypeId::Decimal);
        assert_eq!(spec.precision, 2);
        assert!(!spec.is_integer_like());

        let spec = FieldTypeRegistry::resolve_with_precision(&FieldTypeId::Currency, Some(0));
        assert_eq!(spec.input_kind, InputKind::IntegerNumber);
        assert!(spec.is_integer_like());

        let spec = FieldTypeRegistry::resolve_with_precision(&FieldTypeId::Integer, Some(3));
        assert!(spec.is_integer_like());
    }
}
