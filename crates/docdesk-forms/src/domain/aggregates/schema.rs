//! Document type schema aggregate

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FieldId, FieldTypeId, FieldTypeRegistry, FieldTypeSpec};

/// Field name floated to the top of every rendered form
pub const DOCUMENT_NAME_FIELD: &str = "Nombre del Documento";

/// One option of an enumeration field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub value: String,
}

impl EnumOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// One schema entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: FieldId,
    pub name: String,
    pub type_id: FieldTypeId,
    /// Maximum characters; absent or 0 means unbounded
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub specific_values: Vec<EnumOption>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<FieldId>, name: impl Into<String>, type_id: FieldTypeId) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_id,
            length: None,
            precision: None,
            is_required: false,
            specific_values: vec![],
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specific_values = options.into_iter().map(EnumOption::new).collect();
        self
    }

    /// Registry entry with this field's own precision applied
    pub fn spec(&self) -> FieldTypeSpec {
        FieldTypeRegistry::resolve_with_precision(&self.type_id, self.precision)
    }

    /// Positive maximum length, if any
    pub fn max_length(&self) -> Option<usize> {
        self.length.filter(|l| *l > 0).map(|l| l as usize)
    }

    pub fn is_document_name(&self) -> bool {
        self.name.trim().to_lowercase() == DOCUMENT_NAME_FIELD.to_lowercase()
    }

    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        self.specific_values.iter().map(|o| o.value.as_str())
    }
}

/// Admin-defined document type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeSchema {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    fields: Vec<FieldDefinition>,
}

impl DocumentTypeSchema {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            alias: String::new(),
            description: String::new(),
            fields,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Fields in schema order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDefinition> {
        let name = name.trim();
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    /// Replace the whole field list; partial patches are not supported
    pub fn replace_fields(&mut self, fields: Vec<FieldDefinition>) {
        self.fields = fields;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_by_name() {
        let schema = DocumentTypeSchema::new(
            "1",
            "Contract",
            vec![
                FieldDefinition::new("10", "Amount", FieldTypeId::Currency),
                FieldDefinition::new("11", "Signed", FieldTypeId::Boolean),
            ],
        );
        assert_eq!(schema.field_by_name("signed").map(|f| f.id.as_str()), Some("11"));
        assert!(schema.field_by_name("missing").is_none());
    }

    #[test]
    fn test_document_name_match_is_case_insensitive() {
        let field = FieldDefinition::new("1", "NOMBRE DEL DOCUMENTO", FieldTypeId::ShortText);
        assert!(field.is_document_name());
    }

    #[test]
    fn test_zero_length_is_unbounded() {
        let field = FieldDefinition::new("1", "Notes", FieldTypeId::LongText).with_length(0);
        assert_eq!(field.max_length(), None);
    }

    #[test]
    fn test_deserialize_from_camel_case() {
        let json = serde_json::json!({
            "id": "4",
            "name": "Color",
            "typeId": "enumeration",
            "isRequired": true,
            "specificValues": [{"value": "Red"}]
        });
        let field: FieldDefinition = serde_json::from_value(json).unwrap();
        assert!(field.is_required);
        assert_eq!(field.option_values().collect::<Vec<_>>(), vec!["Red"]);
    }
}
