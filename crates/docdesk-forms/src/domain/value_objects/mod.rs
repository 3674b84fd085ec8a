//! Value Objects module
//!
//! Immutable, validated domain primitives.

pub mod email;
pub mod field_type;
pub mod field_value;

pub use email::{EmailAddress, EmailError};
pub use field_type::{FieldTypeId, FieldTypeRegistry, FieldTypeSpec, InputKind, ValueKind};
pub use field_value::{normalize_flag, FieldValue, RawValue, StoredValues};

const TEMPORARY_PREFIX: &str = "tmp-";

/// Identifier of a field definition.
///
/// Backend-assigned once the schema has been saved; before that a locally
/// generated temporary id that is never sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh local id for a field that has not been saved yet
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMPORARY_PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_ids_are_unique() {
        let a = FieldId::temporary();
        let b = FieldId::temporary();
        assert_ne!(a, b);
        assert!(a.is_temporary());
        assert!(!FieldId::new("42").is_temporary());
    }
}
