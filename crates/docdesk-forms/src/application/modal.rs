//! Document modal
//!
//! Lifecycle of one document form: `Closed -> Open(mode)`, value changes
//! while open, then submit or cancel back to `Closed`.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{Attachment, DocumentSubmission};
use crate::domain::aggregates::{Company, Document, DocumentTypeSchema, FieldDefinition};
use crate::domain::services::{
    AssociationSelection, FormEngine, FormMode, FormState, MultiSelectAssociation, Rejection,
    SummaryStyle,
};
use crate::domain::value_objects::{FieldId, FieldValue, RawValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalStatus {
    Closed,
    Open(FormMode),
}

#[derive(Debug)]
struct OpenForm {
    mode: FormMode,
    schema: Arc<DocumentTypeSchema>,
    state: FormState,
    companies: MultiSelectAssociation<Company>,
    attachment: Option<Attachment>,
    document_id: Option<String>,
    stored_file_name: Option<String>,
    in_flight: bool,
    cancel: CancellationToken,
}

impl Drop for OpenForm {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One document modal instance
#[derive(Debug, Default)]
pub struct DocumentModal {
    form: Option<OpenForm>,
}

impl DocumentModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a blank create form
    pub fn open_create(
        &mut self,
        schema: Arc<DocumentTypeSchema>,
        companies: Vec<Company>,
    ) -> Result<(), ModalError> {
        let state = FormEngine::new(&schema).initialize(FormMode::Create, None);
        self.open(OpenForm {
            mode: FormMode::Create,
            schema,
            state,
            companies: Self::company_picker(companies, AssociationSelection::new()),
            attachment: None,
            document_id: None,
            stored_file_name: None,
            in_flight: false,
            cancel: CancellationToken::new(),
        })
    }

    /// Open an edit or view form pre-populated from a stored document
    pub fn open_existing(
        &mut self,
        mode: FormMode,
        schema: Arc<DocumentTypeSchema>,
        document: &Document,
        companies: Vec<Company>,
    ) -> Result<(), ModalError> {
        let state = FormEngine::new(&schema).initialize(mode, Some(&document.values));
        let selection = document.company_ids.iter().cloned().collect();
        self.open(OpenForm {
            mode,
            schema,
            state,
            companies: Self::company_picker(companies, selection),
            attachment: None,
            document_id: Some(document.id.clone()),
            stored_file_name: document.file_name.clone(),
            in_flight: false,
            cancel: CancellationToken::new(),
        })
    }

    fn open(&mut self, form: OpenForm) -> Result<(), ModalError> {
        if self.form.is_some() {
            return Err(ModalError::AlreadyOpen);
        }
        self.form = Some(form);
        Ok(())
    }

    fn company_picker(
        companies: Vec<Company>,
        selection: AssociationSelection,
    ) -> MultiSelectAssociation<Company> {
        MultiSelectAssociation::new(companies)
            .with_selection(selection)
            .with_style(SummaryStyle::Names)
            .with_placeholder("No companies")
    }

    pub fn status(&self) -> ModalStatus {
        match &self.form {
            Some(form) => ModalStatus::Open(form.mode),
            None => ModalStatus::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    /// True while a submit is in flight; the submit action is disabled
    pub fn is_submitting(&self) -> bool {
        self.form.as_ref().map(|f| f.in_flight).unwrap_or(false)
    }

    pub fn schema(&self) -> Option<&DocumentTypeSchema> {
        self.form.as_ref().map(|f| f.schema.as_ref())
    }

    pub fn state(&self) -> Option<&FormState> {
        self.form.as_ref().map(|f| &f.state)
    }

    pub fn document_id(&self) -> Option<&str> {
        self.form.as_ref().and_then(|f| f.document_id.as_deref())
    }

    /// File name of the stored document, or of the newly attached file
    pub fn file_name(&self) -> Option<&str> {
        let form = self.form.as_ref()?;
        form.attachment
            .as_ref()
            .map(|a| a.file_name.as_str())
            .or(form.stored_file_name.as_deref())
    }

    pub fn companies(&self) -> Option<&MultiSelectAssociation<Company>> {
        self.form.as_ref().map(|f| &f.companies)
    }

    pub fn companies_mut(&mut self) -> Option<&mut MultiSelectAssociation<Company>> {
        self.form.as_mut().map(|f| &mut f.companies)
    }

    /// Token tied to this modal instance; cancelled when the modal closes
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.form.as_ref().map(|f| f.cancel.clone())
    }

    /// Fields with their current values, in render order
    pub fn rows(&self) -> Vec<(&FieldDefinition, Option<&FieldValue>)> {
        let Some(form) = &self.form else {
            return vec![];
        };
        FormEngine::new(&form.schema)
            .render_order()
            .into_iter()
            .map(|field| (field, form.state.get(&field.id)))
            .collect()
    }

    pub fn set_field_value(
        &mut self,
        field_id: &FieldId,
        raw: impl Into<RawValue>,
    ) -> Result<(), ModalError> {
        let form = self.form.as_mut().ok_or(ModalError::Closed)?;
        FormEngine::new(&form.schema)
            .set_field_value(&mut form.state, field_id, raw)
            .map_err(ModalError::Rejected)
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        raw: impl Into<RawValue>,
    ) -> Result<(), ModalError> {
        let form = self.form.as_ref().ok_or(ModalError::Closed)?;
        let field_id = form
            .schema
            .field_by_name(name)
            .map(|f| f.id.clone())
            .ok_or_else(|| ModalError::UnknownField(name.to_string()))?;
        self.set_field_value(&field_id, raw)
    }

    pub fn toggle_company(&mut self, company_id: &str) -> Result<Option<bool>, ModalError> {
        let form = self.form.as_mut().ok_or(ModalError::Closed)?;
        if form.mode.is_read_only() {
            return Err(ModalError::Rejected(Rejection::ReadOnly));
        }
        Ok(form.companies.toggle(company_id))
    }

    pub fn attach(&mut self, attachment: Attachment) -> Result<(), ModalError> {
        let form = self.form.as_mut().ok_or(ModalError::Closed)?;
        if form.mode.is_read_only() {
            return Err(ModalError::Rejected(Rejection::ReadOnly));
        }
        form.attachment = Some(attachment);
        Ok(())
    }

    /// Start a submit: raises the in-flight flag and returns the payload
    pub fn begin_submit(&mut self) -> Result<DocumentSubmission, ModalError> {
        let form = self.form.as_mut().ok_or(ModalError::Closed)?;

        if form.mode.is_read_only() {
            return Err(ModalError::Rejected(Rejection::ReadOnly));
        }
        if form.in_flight {
            return Err(ModalError::InFlight);
        }
        if form.mode == FormMode::Create && form.attachment.is_none() {
            return Err(ModalError::MissingAttachment);
        }

        let submission = DocumentSubmission {
            document_id: form.document_id.clone(),
            doc_type_id: form.schema.id.clone(),
            fields: FormEngine::new(&form.schema).serialize(&form.state),
            company_ids: form.companies.selected_ids(),
            attachment: form.attachment.clone(),
        };
        form.in_flight = true;
        Ok(submission)
    }

    /// Settle a submit. Success closes the modal; failure keeps every value.
    pub fn finish_submit(&mut self, succeeded: bool) {
        if succeeded {
            self.form = None;
        } else if let Some(form) = self.form.as_mut() {
            form.in_flight = false;
        }
    }

    /// Close without saving; pending requests of this modal are cancelled
    pub fn cancel(&mut self) {
        self.form = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    Closed,
    AlreadyOpen,
    InFlight,
    MissingAttachment,
    UnknownField(String),
    Rejected(Rejection),
}

impl std::error::Error for ModalError {}

impl std::fmt::Display for ModalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Form is not open"),
            Self::AlreadyOpen => write!(f, "Form is already open"),
            Self::InFlight => write!(f, "A save is already in progress"),
            Self::MissingAttachment => write!(f, "A file is required to create a document"),
            Self::UnknownField(name) => write!(f, "Unknown field: {}", name),
            Self::Rejected(r) => write!(f, "{}", r),
        }
    }
}
