//! In-memory backend implementation for testing and offline use

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{
    ContactPayload, DocTypeDraft, DocumentSubmission, RolePayload, SendDocumentsRequest,
};
use crate::domain::aggregates::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, EnumOption,
    FieldDefinition, Permission, Role, User,
};
use crate::domain::value_objects::field_value::stored_text;
use crate::domain::value_objects::{FieldId, StoredValues};
use crate::ports::outbound::{BackendError, DocumentBackend};

#[derive(Default)]
struct State {
    doc_types: Vec<DocumentTypeSchema>,
    companies: Vec<Company>,
    contacts: Vec<(String, Contact)>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    users: Vec<User>,
    documents: Vec<(Document, DocumentSummary)>,
    sent: Vec<SendDocumentsRequest>,
    current_user: Option<User>,
    fail_next: Option<BackendError>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-memory document backend (for testing)
#[derive(Default)]
pub struct InMemoryBackend {
    state: RwLock<State>,
    latency: Option<Duration>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_doc_type(self, schema: DocumentTypeSchema) -> Self {
        self.state.write().doc_types.push(schema);
        self
    }

    pub fn with_company(self, company: Company) -> Self {
        self.state.write().companies.push(company);
        self
    }

    pub fn with_permission(self, permission: Permission) -> Self {
        self.state.write().permissions.push(permission);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.state.write().users.push(user);
        self
    }

    pub fn with_document(self, document: Document) -> Self {
        {
            let mut state = self.state.write();
            let summary = summarize(&state.doc_types, &document);
            state.documents.push((document, summary));
        }
        self
    }

    pub fn signed_in_as(self, user: User) -> Self {
        self.state.write().current_user = Some(user);
        self
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: BackendError) {
        self.state.write().fail_next = Some(error);
    }

    pub fn sent(&self) -> Vec<SendDocumentsRequest> {
        self.state.read().sent.clone()
    }

    pub fn document_count(&self) -> usize {
        self.state.read().documents.len()
    }

    /// A call cancelled before it starts fails; once started it runs to completion
    async fn enter(&self, cancel: &CancellationToken) -> Result<(), BackendError> {
        if cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        let failure = self.state.write().fail_next.take();
        if let Some(error) = failure {
            return Err(error);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }
}

fn summarize(doc_types: &[DocumentTypeSchema], document: &Document) -> DocumentSummary {
    let name = doc_types
        .iter()
        .find(|s| s.id == document.type_id)
        .and_then(|s| s.fields().iter().find(|f| f.is_document_name()))
        .and_then(|f| document.values.lookup(&f.id, &f.name))
        .map(stored_text)
        .filter(|n| !n.is_empty())
        .or_else(|| document.file_name.clone())
        .unwrap_or_else(|| document.id.clone());

    DocumentSummary {
        id: document.id.clone(),
        type_id: document.type_id.clone(),
        name,
        file_name: document.file_name.clone(),
        created_at: Some(Utc::now()),
    }
}

fn to_summary(schema: &DocumentTypeSchema) -> DocTypeSummary {
    DocTypeSummary {
        id: schema.id.clone(),
        name: schema.name.clone(),
        alias: schema.alias.clone(),
        description: schema.description.clone(),
    }
}

fn to_schema(state: &mut State, id: String, draft: &DocTypeDraft) -> DocumentTypeSchema {
    let fields = draft
        .fields
        .iter()
        .map(|f| {
            let field_id = match &f.id {
                Some(id) => FieldId::new(id.clone()),
                None => FieldId::new(state.next_id("field")),
            };
            FieldDefinition {
                id: field_id,
                name: f.name.clone(),
                type_id: f.type_id.clone(),
                length: f.length,
                precision: f.precision,
                is_required: f.is_required,
                specific_values: f
                    .specific_values
                    .iter()
                    .map(|o| EnumOption::new(o.value.clone()))
                    .collect(),
            }
        })
        .collect();

    DocumentTypeSchema::new(id, draft.name.clone(), fields)
        .with_alias(draft.alias.clone())
        .with_description(draft.description.clone())
}

fn to_values(submission: &DocumentSubmission) -> StoredValues {
    submission
        .fields
        .iter()
        .map(|entry| (entry.field_id.to_string(), entry.value.clone()))
        .collect()
}

fn to_contact(id: String, payload: &ContactPayload) -> Contact {
    Contact {
        id,
        name: payload.name.clone(),
        email: payload.email.clone(),
        phone: payload.phone.clone(),
        company_id: payload.company_id.clone(),
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn list_doc_types(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocTypeSummary>, BackendError> {
        self.enter(cancel).await?;
        Ok(self.state.read().doc_types.iter().map(to_summary).collect())
    }

    async fn get_doc_type(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<DocumentTypeSchema, BackendError> {
        self.enter(cancel).await?;
        self.state
            .read()
            .doc_types
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("document type {}", id)))
    }

    async fn create_doc_type(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary, BackendError> {
        self.enter(cancel).await?;
        let mut state = self.state.write();
        let id = state.next_id("dt");
        let schema = to_schema(&mut state, id, draft);
        let summary = to_summary(&schema);
        state.doc_types.push(schema);
        Ok(summary)
    }

    async fn edit_doc_type(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary, BackendError> {
        self.enter(cancel).await?;
        let id = draft
            .id
            .clone()
            .ok_or_else(|| BackendError::MalformedBody("missing document type id".into()))?;
        let mut state = self.state.write();
        let index = state
            .doc_types
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("document type {}", id)))?;
        let schema = to_schema(&mut state, id, draft);
        let summary = to_summary(&schema);
        state.doc_types[index] = schema;
        Ok(summary)
    }

    async fn list_companies(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Company>, BackendError> {
        self.enter(cancel).await?;
        Ok(self.state.read().companies.clone())
    }

    async fn list_contacts(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Contact>, BackendError> {
        self.enter(cancel).await?;
        Ok(self
            .state
            .read()
            .contacts
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn create_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact, BackendError> {
        self.enter(cancel).await?;
        let mut state = self.state.write();
        let owner = contact
            .user_id
            .clone()
            .or_else(|| state.current_user.as_ref().map(|u| u.id.clone()))
            .unwrap_or_default();
        let id = state.next_id("contact");
        let created = to_contact(id, contact);
        state.contacts.push((owner, created.clone()));
        Ok(created)
    }

    async fn update_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact, BackendError> {
        self.enter(cancel).await?;
        let id = contact
            .contact_id
            .clone()
            .ok_or_else(|| BackendError::MalformedBody("missing contact id".into()))?;
        let mut state = self.state.write();
        let entry = state
            .contacts
            .iter_mut()
            .find(|(_, c)| c.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("contact {}", id)))?;
        entry.1 = to_contact(id, contact);
        Ok(entry.1.clone())
    }

    async fn list_roles(&self, cancel: &CancellationToken) -> Result<Vec<Role>, BackendError> {
        self.enter(cancel).await?;
        Ok(self.state.read().roles.clone())
    }

    async fn list_permissions(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Permission>, BackendError> {
        self.enter(cancel).await?;
        Ok(self.state.read().permissions.clone())
    }

    async fn list_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, BackendError> {
        self.enter(cancel).await?;
        Ok(self.state.read().users.clone())
    }

    async fn add_role(
        &self,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role, BackendError> {
        self.enter(cancel).await?;
        let mut state = self.state.write();
        let created = Role {
            id: state.next_id("role"),
            name: role.name.clone(),
            permission_ids: role.permission_ids.clone(),
        };
        state.roles.push(created.clone());
        Ok(created)
    }

    async fn edit_role(
        &self,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role, BackendError> {
        self.enter(cancel).await?;
        let id = role
            .role_id
            .clone()
            .ok_or_else(|| BackendError::MalformedBody("missing role id".into()))?;
        let mut state = self.state.write();
        let existing = state
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("role {}", id)))?;
        existing.name = role.name.clone();
        existing.permission_ids = role.permission_ids.clone();
        Ok(existing.clone())
    }

    async fn list_documents(
        &self,
        type_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocumentSummary>, BackendError> {
        self.enter(cancel).await?;
        Ok(self
            .state
            .read()
            .documents
            .iter()
            .filter(|(d, _)| d.type_id == type_id)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn get_document(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError> {
        self.enter(cancel).await?;
        self.state
            .read()
            .documents
            .iter()
            .find(|(d, _)| d.id == id)
            .map(|(d, _)| d.clone())
            .ok_or_else(|| BackendError::NotFound(format!("document {}", id)))
    }

    async fn create_document(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError> {
        self.enter(cancel).await?;
        let attachment = submission
            .attachment
            .as_ref()
            .ok_or_else(|| BackendError::Status { code: 400, message: "file is required".into() })?;
        let mut state = self.state.write();
        let document = Document {
            id: state.next_id("doc"),
            type_id: submission.doc_type_id.clone(),
            file_name: Some(attachment.file_name.clone()),
            values: to_values(submission),
            company_ids: submission.company_ids.clone(),
        };
        let summary = summarize(&state.doc_types, &document);
        state.documents.push((document.clone(), summary));
        Ok(document)
    }

    async fn edit_document(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError> {
        self.enter(cancel).await?;
        let id = submission
            .document_id
            .clone()
            .ok_or_else(|| BackendError::MalformedBody("missing document id".into()))?;
        let mut state = self.state.write();
        let index = state
            .documents
            .iter()
            .position(|(d, _)| d.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("document {}", id)))?;

        let previous = &state.documents[index].0;
        let file_name = submission
            .attachment
            .as_ref()
            .map(|a| a.file_name.clone())
            .or_else(|| previous.file_name.clone());
        let document = Document {
            id,
            type_id: submission.doc_type_id.clone(),
            file_name,
            values: to_values(submission),
            company_ids: submission.company_ids.clone(),
        };
        let summary = summarize(&state.doc_types, &document);
        state.documents[index] = (document.clone(), summary);
        Ok(document)
    }

    async fn send_documents(
        &self,
        request: &SendDocumentsRequest,
        cancel: &CancellationToken,
    ) -> Result<(), BackendError> {
        self.enter(cancel).await?;
        self.state.write().sent.push(request.clone());
        Ok(())
    }

    async fn current_user(&self, cancel: &CancellationToken) -> Result<User, BackendError> {
        self.enter(cancel).await?;
        self.state.read().current_user.clone().ok_or(BackendError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{Attachment, FieldPayload};
    use crate::domain::services::FieldEntry;
    use crate::domain::value_objects::FieldTypeId;
    use serde_json::json;

    fn schema() -> DocumentTypeSchema {
        DocumentTypeSchema::new(
            "dt-1",
            "Contract",
            vec![FieldDefinition::new("f1", "Nombre del Documento", FieldTypeId::ShortText)],
        )
    }

    #[tokio::test]
    async fn test_document_summary_uses_name_field() {
        let backend = InMemoryBackend::new().with_doc_type(schema());
        let cancel = CancellationToken::new();
        let submission = DocumentSubmission {
            document_id: None,
            doc_type_id: "dt-1".into(),
            fields: vec![FieldEntry { field_id: "f1".into(), value: json!("Lease 2024") }],
            company_ids: vec![],
            attachment: Some(Attachment::new("lease.pdf", vec![1, 2, 3])),
        };
        let created = backend.create_document(&submission, &cancel).await.unwrap();
        assert_eq!(created.file_name.as_deref(), Some("lease.pdf"));

        let listed = backend.list_documents("dt-1", &cancel).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Lease 2024");
    }

    #[tokio::test]
    async fn test_doc_type_round_trip_assigns_field_ids() {
        let backend = InMemoryBackend::new();
        let cancel = CancellationToken::new();
        let draft = DocTypeDraft {
            id: None,
            name: "Invoice".into(),
            alias: "INV".into(),
            description: String::new(),
            fields: vec![FieldPayload {
                id: None,
                name: "Total".into(),
                type_id: FieldTypeId::Currency,
                length: None,
                precision: Some(2),
                is_required: true,
                specific_values: vec![],
            }],
        };
        let summary = backend.create_doc_type(&draft, &cancel).await.unwrap();
        let schema = backend.get_doc_type(&summary.id, &cancel).await.unwrap();
        assert_eq!(schema.alias, "INV");
        assert!(!schema.fields()[0].id.is_temporary());
        assert!(schema.fields()[0].is_required);
    }

    #[tokio::test]
    async fn test_cancelled_token_and_injected_failure() {
        let backend = InMemoryBackend::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(backend.list_companies(&cancel).await, Err(BackendError::Cancelled));

        backend.fail_next(BackendError::Transport("offline".into()));
        let fresh = CancellationToken::new();
        assert!(matches!(backend.list_roles(&fresh).await, Err(BackendError::Transport(_))));
        assert!(backend.list_roles(&fresh).await.is_ok());
    }

    #[tokio::test]
    async fn test_current_user_requires_session() {
        let backend = InMemoryBackend::new();
        let cancel = CancellationToken::new();
        assert_eq!(backend.current_user(&cancel).await, Err(BackendError::Unauthenticated));
    }
}
