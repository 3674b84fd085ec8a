//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces.

use async_trait::async_trait;

use crate::application::{
    ContactDraft, DocTypeEditor, DocTypeError, DocumentModal, EditorError, ModalError, RoleEditor,
    SendDocumentsForm, SendError, Warning,
};
use crate::domain::aggregates::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, Permission,
    Role, User,
};
use crate::domain::services::{DocumentQuery, FormMode};
use crate::ports::outbound::BackendError;

/// Document desk use cases
#[async_trait]
pub trait DeskUseCases: Send + Sync {
    /// Fetch schema and companies, then open a blank create form
    async fn open_create(
        &self,
        modal: &mut DocumentModal,
        type_id: &str,
    ) -> Result<(), UseCaseError>;

    /// Fetch a stored document and open it for edit or view
    async fn open_existing(
        &self,
        modal: &mut DocumentModal,
        document_id: &str,
        mode: FormMode,
    ) -> Result<(), UseCaseError>;

    /// Submit the open form
    async fn submit(&self, modal: &mut DocumentModal) -> Result<Document, UseCaseError>;

    async fn list_documents(
        &self,
        type_id: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<DocumentSummary>, UseCaseError>;

    async fn list_doc_types(&self) -> Result<Vec<DocTypeSummary>, UseCaseError>;

    async fn get_doc_type(&self, id: &str) -> Result<DocumentTypeSchema, UseCaseError>;

    /// Create or edit a document type
    async fn save_doc_type(
        &self,
        editor: &DocTypeEditor,
    ) -> Result<(DocTypeSummary, Vec<Warning>), UseCaseError>;

    async fn send_documents(&self, form: &SendDocumentsForm) -> Result<(), UseCaseError>;

    async fn save_role(&self, editor: &RoleEditor) -> Result<Role, UseCaseError>;

    async fn save_contact(&self, draft: &ContactDraft) -> Result<Contact, UseCaseError>;

    async fn list_companies(&self) -> Result<Vec<Company>, UseCaseError>;

    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>, UseCaseError>;

    async fn list_roles(&self) -> Result<Vec<Role>, UseCaseError>;

    async fn list_permissions(&self) -> Result<Vec<Permission>, UseCaseError>;

    async fn list_users(&self) -> Result<Vec<User>, UseCaseError>;

    async fn current_user(&self) -> Result<User, UseCaseError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    Backend(BackendError),
    Modal(ModalError),
    Validation(String),
    NotFound(String),
    Cancelled,
}

impl UseCaseError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::error::Error for UseCaseError {}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "{}", e),
            Self::Modal(e) => write!(f, "{}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::NotFound(e) => write!(f, "Not found: {}", e),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<BackendError> for UseCaseError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Cancelled => Self::Cancelled,
            BackendError::NotFound(what) => Self::NotFound(what),
            other => Self::Backend(other),
        }
    }
}

impl From<ModalError> for UseCaseError {
    fn from(e: ModalError) -> Self {
        Self::Modal(e)
    }
}

impl From<DocTypeError> for UseCaseError {
    fn from(e: DocTypeError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<SendError> for UseCaseError {
    fn from(e: SendError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<EditorError> for UseCaseError {
    fn from(e: EditorError) -> Self {
        Self::Validation(e.to_string())
    }
}
