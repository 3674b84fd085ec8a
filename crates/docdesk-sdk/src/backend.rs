//! HTTP implementation of the forms crate's backend port

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use docdesk_forms::application::dto::{
    ContactPayload, DocTypeDraft, DocumentSubmission, RolePayload, SendDocumentsRequest,
};
use docdesk_forms::{
    BackendError, Company, Contact, DocTypeSummary, Document, DocumentBackend, DocumentSummary,
    DocumentTypeSchema, Permission, Role, User,
};

use crate::client::Client;

/// [`DocumentBackend`] over the REST API
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn list_doc_types(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocTypeSummary>, BackendError> {
        Ok(self.client.doc_types().list(cancel).await?)
    }

    async fn get_doc_type(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<DocumentTypeSchema, BackendError> {
        Ok(self.client.doc_types().get(id, cancel).await?)
    }

    async fn create_doc_type(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary, BackendError> {
        Ok(self.client.doc_types().create(draft, cancel).await?)
    }

    async fn edit_doc_type(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary, BackendError> {
        Ok(self.client.doc_types().edit(draft, cancel).await?)
    }

    async fn list_companies(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Company>, BackendError> {
        Ok(self.client.directory().companies(cancel).await?)
    }

    async fn list_contacts(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Contact>, BackendError> {
        Ok(self.client.directory().contacts(user_id, cancel).await?)
    }

    async fn create_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact, BackendError> {
        Ok(self.client.directory().create_contact(contact, cancel).await?)
    }

    async fn update_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact, BackendError> {
        Ok(self.client.directory().update_contact(contact, cancel).await?)
    }

    async fn list_roles(&self, cancel: &CancellationToken) -> Result<Vec<Role>, BackendError> {
        Ok(self.client.directory().roles(cancel).await?)
    }

    async fn list_permissions(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Permission>, BackendError> {
        Ok(self.client.directory().permissions(cancel).await?)
    }

    async fn list_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, BackendError> {
        Ok(self.client.directory().users(cancel).await?)
    }

    async fn add_role(
        &self,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role, BackendError> {
        Ok(self.client.directory().add_role(role, cancel).await?)
    }

    async fn edit_role(
        &self,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role, BackendError> {
        Ok(self.client.directory().edit_role(role, cancel).await?)
    }

    async fn list_documents(
        &self,
        type_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocumentSummary>, BackendError> {
        Ok(self.client.documents().list_by_type(type_id, cancel).await?)
    }

    async fn get_document(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError> {
        Ok(self.client.documents().get(id, cancel).await?)
    }

    async fn create_document(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError> {
        Ok(self.client.documents().create(submission, cancel).await?)
    }

    async fn edit_document(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document, BackendError> {
        Ok(self.client.documents().edit(submission, cancel).await?)
    }

    async fn send_documents(
        &self,
        request: &SendDocumentsRequest,
        cancel: &CancellationToken,
    ) -> Result<(), BackendError> {
        Ok(self.client.documents().send(request, cancel).await?)
    }

    async fn current_user(&self, cancel: &CancellationToken) -> Result<User, BackendError> {
        Ok(self.client.session().current_user(cancel).await?)
    }
}
