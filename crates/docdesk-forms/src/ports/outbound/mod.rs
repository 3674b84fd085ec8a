//! Outbound ports (Backend trait)
//!
//! Hexagonal architecture: the REST backend the client talks to. Every call
//! takes the cancellation token of the form or command that issued it.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{
    ContactPayload, DocTypeDraft, DocumentSubmission, RolePayload, SendDocumentsRequest,
};
use crate::domain::aggregates::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, Permission,
    Role, User,
};

/// Document management backend port
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// List document types (`GET /documents/getDocType`)
    async fn list_doc_types(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocTypeSummary>, BackendError>;

    /// Fetch a full schema (`GET /documents/getDocTypeFull`)
    async fn get_doc_type(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<DocumentTypeSchema, BackendError>;

    async fn create_doc_type(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary, BackendError>;

    async fn edit_doc_type(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary, BackendError>;

    async fn list_companies(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Company>, BackendError>;

    async fn list_contacts(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Contact>, BackendError>;

    async fn create_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact, BackendError>;

    async fn update_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact, BackendError>;

    async fn list_roles(&self, cancel: &CancellationToken) -> Result<Vec<Role>, BackendError>;

    async fn list_permissions(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Permission>, BackendError>;

    async fn list_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, BackendError>;

    async fn add_role(
        &self,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role, BackendError>;

    async fn edit_role(
        &self,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role, BackendError>;

    async fn list_documents(
        &self,
        type_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocumentSummary>, BackendError>;

    async fn get_document(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError>;

    /// Multipart upload: `file` plus JSON `data`
    async fn create_document(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError>;

    async fn edit_document(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError>;

    async fn send_documents(
        &self,
        request: &SendDocumentsRequest,
        cancel: &CancellationToken,
    ) -> Result<(), BackendError>;

    /// Session check (`GET /documents/getUser`)
    async fn current_user(&self, cancel: &CancellationToken) -> Result<User, BackendError>;
}

/// Backend error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Network or transport failure
    Transport(String),
    /// Non-2xx response
    Status { code: u16, message: String },
    /// Empty or unexpected body
    MalformedBody(String),
    Unauthenticated,
    NotFound(String),
    Cancelled,
}

impl BackendError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::error::Error for BackendError {}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Network error: {}", e),
            Self::Status { code, message } => write!(f, "Server responded {}: {}", code, message),
            Self::MalformedBody(e) => write!(f, "Unexpected response: {}", e),
            Self::Unauthenticated => write!(f, "Not signed in"),
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::Cancelled => write!(f, "Request cancelled"),
        }
    }
}
