//! Endpoint groups
//!
//! Every call returns canonical entities; the raw JSON goes through
//! [`crate::adapters`] first.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use docdesk_forms::application::dto::{
    ContactPayload, DocTypeDraft, DocumentSubmission, RolePayload, SendDocumentsRequest,
};
use docdesk_forms::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, Permission,
    Role, User,
};

use crate::adapters;
use crate::client::{Client, FilePart};
use crate::Result;

// =============================================================================
// Document Types
// =============================================================================

pub struct DocTypesService {
    client: Client,
}

impl DocTypesService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, cancel: &CancellationToken) -> Result<Vec<DocTypeSummary>> {
        let body = self.client.get("documents/getDocType", &[], cancel).await?;
        adapters::list(&body, adapters::doc_type_summary)
    }

    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<DocumentTypeSchema> {
        let body = self.client.get("documents/getDocTypeFull", &[("id", id)], cancel).await?;
        adapters::doc_type_schema(&body)
    }

    pub async fn create(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary> {
        let body = self
            .client
            .send_json(Method::POST, "documents/createDocType", draft, cancel)
            .await?
            .require()?;
        Ok(with_draft(adapters::doc_type_summary(&body)?, draft))
    }

    pub async fn edit(
        &self,
        draft: &DocTypeDraft,
        cancel: &CancellationToken,
    ) -> Result<DocTypeSummary> {
        let body = self
            .client
            .send_json(Method::PUT, "documents/editDocType", draft, cancel)
            .await?;
        match (body.require(), &draft.id) {
            (Ok(body), _) => Ok(with_draft(adapters::doc_type_summary(&body)?, draft)),
            // Edits may answer with an empty body; the draft is then authoritative
            (Err(_), Some(id)) => Ok(DocTypeSummary {
                id: id.clone(),
                name: draft.name.clone(),
                alias: draft.alias.clone(),
                description: draft.description.clone(),
            }),
            (Err(e), None) => Err(e),
        }
    }
}

fn with_draft(mut summary: DocTypeSummary, draft: &DocTypeDraft) -> DocTypeSummary {
    if summary.name.is_empty() {
        summary.name = draft.name.clone();
    }
    if summary.alias.is_empty() {
        summary.alias = draft.alias.clone();
    }
    if summary.description.is_empty() {
        summary.description = draft.description.clone();
    }
    summary
}

// =============================================================================
// Documents
// =============================================================================

pub struct DocumentsService {
    client: Client,
}

impl DocumentsService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_by_type(
        &self,
        type_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DocumentSummary>> {
        let body = self
            .client
            .get("documents/getDocumentByTypeId", &[("id", type_id)], cancel)
            .await?;
        let mut documents = adapters::list(&body, adapters::document_summary)?;
        for document in documents.iter_mut().filter(|d| d.type_id.is_empty()) {
            document.type_id = type_id.to_string();
        }
        Ok(documents)
    }

    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<Document> {
        let body = self.client.get("documents/getDocument", &[("id", id)], cancel).await?;
        adapters::document(&body)
    }

    pub async fn create(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document> {
        self.upload(Method::POST, "documents/createDocument", submission, cancel).await
    }

    pub async fn edit(
        &self,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document> {
        self.upload(Method::PUT, "documents/editDocument", submission, cancel).await
    }

    async fn upload(
        &self,
        method: Method,
        path: &str,
        submission: &DocumentSubmission,
        cancel: &CancellationToken,
    ) -> Result<Document> {
        let file = submission.attachment.as_ref().map(|a| FilePart {
            file_name: a.file_name.clone(),
            content_type: a.content_type.clone(),
            bytes: a.bytes.clone(),
        });
        let body = self
            .client
            .send_multipart(method, path, file, submission, cancel)
            .await?
            .require()?;

        let mut document = adapters::document(&body)?;
        if document.type_id.is_empty() {
            document.type_id = submission.doc_type_id.clone();
        }
        if document.values.is_empty() {
            document.values = submission
                .fields
                .iter()
                .map(|entry| (entry.field_id.to_string(), entry.value.clone()))
                .collect();
        }
        if document.company_ids.is_empty() {
            document.company_ids = submission.company_ids.clone();
        }
        if document.file_name.is_none() {
            document.file_name = submission.attachment.as_ref().map(|a| a.file_name.clone());
        }
        Ok(document)
    }

    pub async fn send(
        &self,
        request: &SendDocumentsRequest,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.client
            .send_json(Method::POST, "documents/sendDocuments", request, cancel)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Companies, Contacts, Roles, Users
// =============================================================================

pub struct DirectoryService {
    client: Client,
}

impl DirectoryService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn companies(&self, cancel: &CancellationToken) -> Result<Vec<Company>> {
        let body = self.client.get("documents/getDocCompanies", &[], cancel).await?;
        adapters::list(&body, adapters::company)
    }

    pub async fn contacts(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Contact>> {
        let body = self.client.get("documents/getContacts", &[("userId", user_id)], cancel).await?;
        adapters::list(&body, adapters::contact)
    }

    pub async fn create_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact> {
        self.save_contact(Method::POST, "documents/createContact", contact, cancel).await
    }

    pub async fn update_contact(
        &self,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact> {
        self.save_contact(Method::PUT, "documents/updateContact", contact, cancel).await
    }

    async fn save_contact(
        &self,
        method: Method,
        path: &str,
        contact: &ContactPayload,
        cancel: &CancellationToken,
    ) -> Result<Contact> {
        let body = self.client.send_json(method, path, contact, cancel).await?;
        let saved = match (body.require(), &contact.contact_id) {
            (Ok(body), _) => adapters::contact(&body)?,
            (Err(_), Some(id)) => Contact {
                id: id.clone(),
                name: String::new(),
                email: String::new(),
                phone: None,
                company_id: None,
            },
            (Err(e), None) => return Err(e),
        };
        Ok(Contact {
            name: non_empty(saved.name, &contact.name),
            email: non_empty(saved.email, &contact.email),
            phone: saved.phone.or_else(|| contact.phone.clone()),
            company_id: saved.company_id.or_else(|| contact.company_id.clone()),
            id: saved.id,
        })
    }

    pub async fn roles(&self, cancel: &CancellationToken) -> Result<Vec<Role>> {
        let body = self.client.get("documents/getRoles", &[], cancel).await?;
        adapters::list(&body, adapters::role)
    }

    pub async fn permissions(&self, cancel: &CancellationToken) -> Result<Vec<Permission>> {
        let body = self.client.get("documents/getPermissions", &[], cancel).await?;
        adapters::list(&body, adapters::permission)
    }

    pub async fn users(&self, cancel: &CancellationToken) -> Result<Vec<User>> {
        let body = self.client.get("documents/getUsers", &[], cancel).await?;
        adapters::list(&body, adapters::user)
    }

    pub async fn add_role(&self, role: &RolePayload, cancel: &CancellationToken) -> Result<Role> {
        self.save_role(Method::POST, "documents/addRole", role, cancel).await
    }

    pub async fn edit_role(&self, role: &RolePayload, cancel: &CancellationToken) -> Result<Role> {
        self.save_role(Method::PUT, "documents/editRole", role, cancel).await
    }

    async fn save_role(
        &self,
        method: Method,
        path: &str,
        role: &RolePayload,
        cancel: &CancellationToken,
    ) -> Result<Role> {
        let body = self.client.send_json(method, path, role, cancel).await?;
        let saved = match (body.require(), &role.role_id) {
            (Ok(body), _) => adapters::role(&body)?,
            (Err(_), Some(id)) => Role {
                id: id.clone(),
                name: String::new(),
                permission_ids: vec![],
            },
            (Err(e), None) => return Err(e),
        };
        Ok(Role {
            name: non_empty(saved.name, &role.name),
            permission_ids: if saved.permission_ids.is_empty() {
                role.permission_ids.clone()
            } else {
                saved.permission_ids
            },
            id: saved.id,
        })
    }
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct SessionService {
    client: Client,
}

impl SessionService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// The signed-in user; fails with `Unauthenticated` without a token
    pub async fn current_user(&self, cancel: &CancellationToken) -> Result<User> {
        if !self.client.auth().is_authenticated() {
            return Err(crate::Error::Unauthenticated);
        }
        let body = self.client.get("documents/getUser", &[], cancel).await?;
        let user_body = adapters::pick(&body, &["user", "User"]).unwrap_or(&body);
        adapters::user(user_body)
    }
}
