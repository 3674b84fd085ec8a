//! Command handlers
//!
//! Application service that orchestrates the desk workflows.

use std::sync::Arc;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::{
    ContactDraft, DocTypeEditor, DocumentModal, ModalError, RoleEditor, SendDocumentsForm, Warning,
};
use crate::domain::aggregates::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, Permission,
    Role, User,
};
use crate::domain::services::{DocumentQuery, FormMode};
use crate::ports::inbound::{DeskUseCases, UseCaseError};
use crate::ports::outbound::DocumentBackend;

/// Desk application service
pub struct DeskService {
    backend: Arc<dyn DocumentBackend>,
    cancel: CancellationToken,
}

impl DeskService {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend, cancel: CancellationToken::new() }
    }

    /// Tie every call that is not owned by a modal to `cancel`
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }
}

#[async_trait]
impl DeskUseCases for DeskService {
    async fn open_create(
        &self,
        modal: &mut DocumentModal,
        type_id: &str,
    ) -> Result<(), UseCaseError> {
        if modal.is_open() {
            return Err(ModalError::AlreadyOpen.into());
        }

        let (schema, companies) = tokio::try_join!(
            self.backend.get_doc_type(type_id, &self.cancel),
            self.backend.list_companies(&self.cancel),
        )?;

        tracing::debug!("Opening create form for document type {}", schema.id);
        modal.open_create(Arc::new(schema), companies)?;
        Ok(())
    }

    async fn open_existing(
        &self,
        modal: &mut DocumentModal,
        document_id: &str,
        mode: FormMode,
    ) -> Result<(), UseCaseError> {
        if mode == FormMode::Create {
            return Err(UseCaseError::Validation(
                "existing documents open in edit or view mode".into(),
            ));
        }
        if modal.is_open() {
            return Err(ModalError::AlreadyOpen.into());
        }

        let document = self.backend.get_document(document_id, &self.cancel).await?;
        let (schema, companies) = tokio::try_join!(
            self.backend.get_doc_type(&document.type_id, &self.cancel),
            self.backend.list_companies(&self.cancel),
        )?;

        tracing::debug!("Opening document {} in {} mode", document.id, mode);
        modal.open_existing(mode, Arc::new(schema), &document, companies)?;
        Ok(())
    }

    async fn submit(&self, modal: &mut DocumentModal) -> Result<Document, UseCaseError> {
        let token = modal.cancel_token().ok_or(ModalError::Closed)?;
        let submission = modal.begin_submit()?;

        let result = match submission.document_id {
            Some(_) => self.backend.edit_document(&submission, &token).await,
            None => self.backend.create_document(&submission, &token).await,
        };

        if token.is_cancelled() {
            tracing::warn!("Discarding result of a cancelled document submit");
            modal.cancel();
            return Err(UseCaseError::Cancelled);
        }

        match result {
            Ok(document) => {
                tracing::info!("Saved document {}", document.id);
                modal.finish_submit(true);
                Ok(document)
            }
            Err(e) => {
                tracing::warn!("Document submit failed: {}", e);
                modal.finish_submit(false);
                Err(e.into())
            }
        }
    }

    async fn list_documents(
        &self,
        type_id: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<DocumentSummary>, UseCaseError> {
        let documents = self.backend.list_documents(type_id, &self.cancel).await?;
        Ok(query.apply(&documents))
    }

    async fn list_doc_types(&self) -> Result<Vec<DocTypeSummary>, UseCaseError> {
        Ok(self.backend.list_doc_types(&self.cancel).await?)
    }

    async fn get_doc_type(&self, id: &str) -> Result<DocumentTypeSchema, UseCaseError> {
        Ok(self.backend.get_doc_type(id, &self.cancel).await?)
    }

    async fn save_doc_type(
        &self,
        editor: &DocTypeEditor,
    ) -> Result<(DocTypeSummary, Vec<Warning>), UseCaseError> {
        let (draft, warnings) = editor.build()?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let saved = match draft.id {
            Some(_) => self.backend.edit_doc_type(&draft, &self.cancel).await?,
            None => self.backend.create_doc_type(&draft, &self.cancel).await?,
        };
        tracing::info!("Saved document type {} ({})", saved.name, saved.id);
        Ok((saved, warnings))
    }

    async fn send_documents(&self, form: &SendDocumentsForm) -> Result<(), UseCaseError> {
        let request = form.build()?;
        self.backend.send_documents(&request, &self.cancel).await?;
        tracing::info!(
            "Sent {} document(s) to {} address(es)",
            request.document_ids.len(),
            request.email_data.to.len()
        );
        Ok(())
    }

    async fn save_role(&self, editor: &RoleEditor) -> Result<Role, UseCaseError> {
        let payload = editor.build()?;
        let role = match payload.role_id {
            Some(_) => self.backend.edit_role(&payload, &self.cancel).await?,
            None => self.backend.add_role(&payload, &self.cancel).await?,
        };
        tracing::info!("Saved role {}", role.name);
        Ok(role)
    }

    async fn save_contact(&self, draft: &ContactDraft) -> Result<Contact, UseCaseError> {
        let payload = draft.build()?;
        let contact = match payload.contact_id {
            Some(_) => self.backend.update_contact(&payload, &self.cancel).await?,
            None => self.backend.create_contact(&payload, &self.cancel).await?,
        };
        tracing::info!("Saved contact {}", contact.name);
        Ok(contact)
    }

    async fn list_companies(&self) -> Result<Vec<Company>, UseCaseError> {
        Ok(self.backend.list_companies(&self.cancel).await?)
    }

    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>, UseCaseError> {
        Ok(self.backend.list_contacts(user_id, &self.cancel).await?)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, UseCaseError> {
        Ok(self.backend.list_roles(&self.cancel).await?)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, UseCaseError> {
        Ok(self.backend.list_permissions(&self.cancel).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, UseCaseError> {
        Ok(self.backend.list_users(&self.cancel).await?)
    }

    async fn current_user(&self) -> Result<User, UseCaseError> {
        Ok(self.backend.current_user(&self.cancel).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::dto::Attachment;
    use crate::application::ModalStatus;
    use crate::domain::aggregates::FieldDefinition;
    use crate::domain::services::{SortDirection, SortKey};
    use crate::domain::value_objects::{FieldTypeId, FieldValue, StoredValues};
    use crate::infrastructure::InMemoryBackend;
    use crate::ports::outbound::BackendError;
    use serde_json::json;

    fn contract() -> DocumentTypeSchema {
        DocumentTypeSchema::new(
            "dt-1",
            "Contract",
            vec![
                FieldDefinition::new("f1", "Nombre del Documento", FieldTypeId::ShortText),
                FieldDefinition::new("f2", "Signed", FieldTypeId::Boolean),
            ],
        )
    }

    fn acme() -> Company {
        Company { id: "c1".into(), name: "Acme".into() }
    }

    fn stored(id: &str, name: &str) -> Document {
        Document {
            id: id.into(),
            type_id: "dt-1".into(),
            file_name: Some(format!("{}.pdf", id)),
            values: [("f1".to_string(), json!(name)), ("f2".to_string(), json!("1"))]
                .into_iter()
                .collect::<StoredValues>(),
            company_ids: vec!["c1".into()],
        }
    }

    fn setup(backend: InMemoryBackend) -> (Arc<InMemoryBackend>, DeskService) {
        let backend = Arc::new(backend.with_doc_type(contract()).with_company(acme()));
        let service = DeskService::new(backend.clone());
        (backend, service)
    }

    #[tokio::test]
    async fn test_create_flow() {
        let (backend, service) = setup(InMemoryBackend::new());
        let mut modal = DocumentModal::new();

        service.open_create(&mut modal, "dt-1").await.unwrap();
        assert_eq!(modal.status(), ModalStatus::Open(FormMode::Create));
        assert_eq!(modal.companies().unwrap().options().len(), 1);

        modal.set_field_by_name("Nombre del Documento", "Lease").unwrap();
        modal.toggle_company("c1").unwrap();
        modal.attach(Attachment::new("lease.pdf", b"%PDF".to_vec())).unwrap();

        let document = service.submit(&mut modal).await.unwrap();
        assert_eq!(modal.status(), ModalStatus::Closed);
        assert_eq!(document.company_ids, vec!["c1".to_string()]);
        assert_eq!(backend.document_count(), 1);
    }

    #[tokio::test]
    async fn test_edit_flow_prefills_values() {
        let (_, service) = setup(InMemoryBackend::new().with_document(stored("d1", "Lease")));
        let mut modal = DocumentModal::new();

        service.open_existing(&mut modal, "d1", FormMode::Edit).await.unwrap();
        let schema = modal.schema().unwrap().clone();
        let state = modal.state().unwrap();
        assert_eq!(state.get_by_name(&schema, "Signed"), Some(&FieldValue::Boolean(true)));
        assert!(modal.companies().unwrap().selection().contains("c1"));

        modal.set_field_by_name("Nombre del Documento", "Lease v2").unwrap();
        let saved = service.submit(&mut modal).await.unwrap();
        assert_eq!(saved.id, "d1");
        assert_eq!(saved.file_name.as_deref(), Some("d1.pdf"));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_open() {
        let (backend, service) = setup(InMemoryBackend::new().with_document(stored("d1", "Lease")));
        let mut modal = DocumentModal::new();
        service.open_existing(&mut modal, "d1", FormMode::Edit).await.unwrap();
        modal.set_field_by_name("Nombre del Documento", "Changed").unwrap();

        backend.fail_next(BackendError::Status { code: 500, message: "boom".into() });
        let err = service.submit(&mut modal).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Backend(BackendError::Status { code: 500, .. })));

        assert!(modal.is_open());
        assert!(!modal.is_submitting());
        let schema = modal.schema().unwrap().clone();
        assert_eq!(
            modal.state().unwrap().get_by_name(&schema, "Nombre del Documento"),
            Some(&FieldValue::Text("Changed".into()))
        );
        assert!(service.submit(&mut modal).await.is_ok());
    }

    #[tokio::test]
    async fn test_view_mode_cannot_submit() {
        let (_, service) = setup(InMemoryBackend::new().with_document(stored("d1", "Lease")));
        let mut modal = DocumentModal::new();
        service.open_existing(&mut modal, "d1", FormMode::View).await.unwrap();
        assert!(matches!(service.submit(&mut modal).await, Err(UseCaseError::Modal(_))));
    }

    #[tokio::test]
    async fn test_late_result_after_cancel_is_discarded() {
        let (backend, service) =
            setup(InMemoryBackend::new().with_latency(Duration::from_millis(50)));
        let mut modal = DocumentModal::new();
        service.open_create(&mut modal, "dt-1").await.unwrap();
        modal.attach(Attachment::new("a.pdf", vec![0])).unwrap();

        let token = modal.cancel_token().unwrap();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = service.submit(&mut modal).await;
        assert_eq!(result, Err(UseCaseError::Cancelled));
        assert_eq!(modal.status(), ModalStatus::Closed);
        // The backend did store it; the client never applied the result.
        assert_eq!(backend.document_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_doc_type_is_not_found() {
        let (_, service) = setup(InMemoryBackend::new());
        let mut modal = DocumentModal::new();
        let err = service.open_create(&mut modal, "nope").await.unwrap_err();
        assert!(matches!(err, UseCaseError::NotFound(_)));
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn test_list_documents_applies_query() {
        let backend = InMemoryBackend::new()
            .with_doc_type(contract())
            .with_document(stored("d1", "Zeta lease"))
            .with_document(stored("d2", "Alpha lease"))
            .with_document(stored("d3", "Invoice"));
        let service = DeskService::new(Arc::new(backend));

        let query = DocumentQuery::new()
            .search("LEASE")
            .sort_by(SortKey::Name, SortDirection::Ascending);
        let docs = service.list_documents("dt-1", &query).await.unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha lease", "Zeta lease"]);
    }

    #[tokio::test]
    async fn test_save_doc_type_create_then_edit() {
        let service = DeskService::new(Arc::new(InMemoryBackend::new()));

        let mut editor = DocTypeEditor::new("Invoice");
        editor.add_field("Status", FieldTypeId::Enumeration);
        let (created, warnings) = service.save_doc_type(&editor).await.unwrap();
        assert_eq!(warnings, vec![Warning::EmptyEnumeration("Status".into())]);

        let schema = service.get_doc_type(&created.id).await.unwrap();
        let mut editor = DocTypeEditor::from_schema(&schema);
        editor.name = "Invoice v2".into();
        let (edited, _) = service.save_doc_type(&editor).await.unwrap();
        assert_eq!(edited.id, created.id);
        assert_eq!(service.list_doc_types().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_documents_validates_first() {
        let backend = Arc::new(InMemoryBackend::new());
        let service = DeskService::new(backend.clone());

        let form = SendDocumentsForm::new(["d1"]);
        assert!(matches!(service.send_documents(&form).await, Err(UseCaseError::Validation(_))));
        assert!(backend.sent().is_empty());

        let mut form = SendDocumentsForm::new(["d1"]);
        form.add_to("ana@example.com");
        form.subject = "Docs".into();
        service.send_documents(&form).await.unwrap();
        assert_eq!(backend.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_role_and_contact_saves() {
        let backend = InMemoryBackend::new()
            .with_permission(Permission { id: "p1".into(), name: "read".into() })
            .signed_in_as(User {
                id: "u1".into(),
                alternate_id: None,
                name: "Ana".into(),
                email: None,
            });
        let service = DeskService::new(Arc::new(backend));

        let mut editor = RoleEditor::new(service.list_permissions().await.unwrap());
        editor.name = "Reader".into();
        editor.permissions_mut().toggle("p1");
        let role = service.save_role(&editor).await.unwrap();
        assert_eq!(role.permission_ids, vec!["p1".to_string()]);

        let mut editor = RoleEditor::from_role(&role, vec![]);
        editor.name = "Readers".into();
        assert_eq!(service.save_role(&editor).await.unwrap().id, role.id);

        let draft = ContactDraft {
            name: "Bo".into(),
            email: "bo@example.com".into(),
            ..Default::default()
        };
        let contact = service.save_contact(&draft).await.unwrap();
        let user = service.current_user().await.unwrap();
        assert_eq!(service.list_contacts(&user.id).await.unwrap(), vec![contact]);
    }

    #[tokio::test]
    async fn test_service_cancellation() {
        let cancel = CancellationToken::new();
        let service =
            DeskService::new(Arc::new(InMemoryBackend::new())).with_cancellation(cancel.clone());
        cancel.cancel();
        assert_eq!(service.list_companies().await, Err(UseCaseError::Cancelled));
    }
}
