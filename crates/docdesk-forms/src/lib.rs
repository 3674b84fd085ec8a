//! DocDesk Forms
//!
//! Schema-driven form engine and workflows for the DocDesk document
//! management client.
//!
//! ## Architecture
//!
//! - **Domain Layer**: field types, schemas, the form engine, enumeration
//!   options and multi-select associations
//! - **Application Layer**: modals, editors and the desk service
//! - **Ports Layer**: the backend the client talks to
//! - **Infrastructure Layer**: in-memory backend
//!
//! ## Flow
//!
//! A document-type schema fetched from the backend is handed to the
//! [`FormEngine`], which asks the [`FieldTypeRegistry`] how to render and
//! validate each field. Enumeration fields are edited through the
//! [`EnumOptionsEditor`], cross-entity links through
//! [`MultiSelectAssociation`]. On submit the engine serializes the values and
//! the [`DeskService`] hands them to a [`DocumentBackend`].

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;

// Re-exports for convenience
pub use domain::aggregates::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, EnumOption,
    FieldDefinition, Permission, Role, User,
};
pub use domain::services::{
    AssociationOption, AssociationSelection, AssociationView, CommitOutcome, DocumentQuery,
    EnumEntry, EnumOptionsEditor, FieldEntry, FormEngine, FormMode, FormState,
    MultiSelectAssociation, Rejection, SortDirection, SortKey, SummaryStyle, WidgetError,
};
pub use domain::value_objects::{
    EmailAddress, EmailError, FieldId, FieldTypeId, FieldTypeRegistry, FieldTypeSpec, FieldValue,
    InputKind, RawValue, StoredValues, ValueKind,
};
pub use application::{
    merge_record, CompanyDraft, ContactDraft, DeskService, DocTypeEditor, DocTypeError,
    DocumentModal, EditorError, ModalError, ModalStatus, RoleEditor, SendDocumentsForm, SendError,
    Warning,
};
pub use ports::inbound::{DeskUseCases, UseCaseError};
pub use ports::outbound::{BackendError, DocumentBackend};
pub use infrastructure::InMemoryBackend;
