//! Aggregates module

pub mod entities;
pub mod schema;

pub use entities::*;
pub use schema::{DocumentTypeSchema, EnumOption, FieldDefinition, DOCUMENT_NAME_FIELD};
