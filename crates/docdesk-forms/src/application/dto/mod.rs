//! Data Transfer Objects (DTOs)
//!
//! Payloads handed to the backend.

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::EnumOption;
use crate::domain::services::FieldEntry;
use crate::domain::value_objects::FieldTypeId;

// =============================================================================
// Document Types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    /// Absent for fields that were never saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub type_id: FieldTypeId,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub is_required: bool,
    pub specific_values: Vec<EnumOption>,
}

/// Full document type as sent on create and edit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTypeDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub alias: String,
    pub description: String,
    pub fields: Vec<FieldPayload>,
}

// =============================================================================
// Documents
// =============================================================================

/// File uploaded with a document
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), content_type: None, bytes }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Document create/edit request; the JSON part travels as the `data` field
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub doc_type_id: String,
    pub fields: Vec<FieldEntry>,
    pub company_ids: Vec<String>,
    #[serde(skip)]
    pub attachment: Option<Attachment>,
}

// =============================================================================
// Roles & Contacts
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    pub name: String,
    pub permission_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_id: Option<String>,
}

// =============================================================================
// Email
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailData {
    pub company_id: Option<String>,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub recipients: Vec<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDocumentsRequest {
    pub document_ids: Vec<String>,
    pub email_data: EmailData,
}
