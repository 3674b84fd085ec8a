//! Admin editors: document types, roles, contacts and companies

use std::collections::HashSet;
use std::fmt;

use crate::application::dto::{ContactPayload, DocTypeDraft, FieldPayload, RolePayload};
use crate::domain::aggregates::{
    Company, Contact, DocTypeSummary, DocumentSummary, DocumentTypeSchema, Permission, Role,
};
use crate::domain::services::{
    AssociationSelection, EnumOptionsEditor, MultiSelectAssociation, SummaryStyle,
};
use crate::domain::value_objects::{EmailAddress, EmailError, FieldId, FieldTypeId};

// =============================================================================
// Document Type Editor
// =============================================================================

/// One field row of the document type editor
#[derive(Clone, Debug)]
pub struct FieldDraft {
    pub id: FieldId,
    pub name: String,
    pub type_id: FieldTypeId,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub is_required: bool,
    options: EnumOptionsEditor,
}

impl FieldDraft {
    pub fn options(&self) -> &EnumOptionsEditor {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut EnumOptionsEditor {
        &mut self.options
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// Enumeration saved without options
    EmptyEnumeration(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEnumeration(name) => write!(f, "Field '{}' has no options", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTypeError {
    MissingName,
    UnnamedField { position: usize },
    DuplicateFieldName(String),
}

impl std::error::Error for DocTypeError {}

impl fmt::Display for DocTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Document type name is required"),
            Self::UnnamedField { position } => write!(f, "Field #{} has no name", position + 1),
            Self::DuplicateFieldName(name) => {
                write!(f, "Field name '{}' is used more than once", name)
            }
        }
    }
}

/// Create or edit a document type
#[derive(Clone, Debug, Default)]
pub struct DocTypeEditor {
    id: Option<String>,
    pub name: String,
    pub alias: String,
    pub description: String,
    fields: Vec<FieldDraft>,
}

impl DocTypeEditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn from_schema(schema: &DocumentTypeSchema) -> Self {
        Self {
            id: Some(schema.id.clone()),
            name: schema.name.clone(),
            alias: schema.alias.clone(),
            description: schema.description.clone(),
            fields: schema
                .fields()
                .iter()
                .map(|f| FieldDraft {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    type_id: f.type_id.clone(),
                    length: f.length,
                    precision: f.precision,
                    is_required: f.is_required,
                    options: EnumOptionsEditor::normalize(f.specific_values.clone()),
                })
                .collect(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn fields(&self) -> &[FieldDraft] {
        &self.fields
    }

    /// Append a field with a temporary id
    pub fn add_field(&mut self, name: impl Into<String>, type_id: FieldTypeId) -> FieldId {
        let id = FieldId::temporary();
        self.fields.push(FieldDraft {
            id: id.clone(),
            name: name.into(),
            type_id,
            length: None,
            precision: None,
            is_required: false,
            options: EnumOptionsEditor::default(),
        });
        id
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldDraft> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut FieldDraft> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    pub fn field_by_name_mut(&mut self, name: &str) -> Option<&mut FieldDraft> {
        let name = name.trim().to_lowercase();
        self.fields.iter_mut().find(|f| f.name.trim().to_lowercase() == name)
    }

    pub fn remove_field(&mut self, id: &FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| &f.id != id);
        self.fields.len() != before
    }

    /// Drop every field; used when a definition file replaces the list
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Validate and produce the full payload plus non-blocking warnings
    pub fn build(&self) -> Result<(DocTypeDraft, Vec<Warning>), DocTypeError> {
        if self.name.trim().is_empty() {
            return Err(DocTypeError::MissingName);
        }

        let mut seen = HashSet::new();
        let mut warnings = vec![];
        let mut fields = Vec::with_capacity(self.fields.len());

        for (position, field) in self.fields.iter().enumerate() {
            let name = field.name.trim();
            if name.is_empty() {
                return Err(DocTypeError::UnnamedField { position });
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(DocTypeError::DuplicateFieldName(name.to_string()));
            }

            let specific_values = if field.type_id.is_enumeration() {
                let outcome = field.options.commit();
                if outcome.empty_warning {
                    warnings.push(Warning::EmptyEnumeration(name.to_string()));
                }
                outcome.options
            } else {
                vec![]
            };

            fields.push(FieldPayload {
                id: (!field.id.is_temporary()).then(|| field.id.to_string()),
                name: name.to_string(),
                type_id: field.type_id.clone(),
                length: field.length,
                precision: field.precision,
                is_required: field.is_required,
                specific_values,
            });
        }

        let draft = DocTypeDraft {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            alias: self.alias.trim().to_string(),
            description: self.description.trim().to_string(),
            fields,
        };
        Ok((draft, warnings))
    }
}

// =============================================================================
// Roles, Contacts, Companies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    MissingName,
    InvalidEmail(EmailError),
}

impl std::error::Error for EditorError {}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Name is required"),
            Self::InvalidEmail(e) => write!(f, "{}", e),
        }
    }
}

/// Role form with its permission picker
#[derive(Clone, Debug)]
pub struct RoleEditor {
    role_id: Option<String>,
    pub name: String,
    permissions: MultiSelectAssociation<Permission>,
}

impl RoleEditor {
    pub fn new(available: Vec<Permission>) -> Self {
        Self {
            role_id: None,
            name: String::new(),
            permissions: Self::picker(available, AssociationSelection::new()),
        }
    }

    pub fn from_role(role: &Role, available: Vec<Permission>) -> Self {
        let selection = role.permission_ids.iter().cloned().collect();
        Self {
            role_id: Some(role.id.clone()),
            name: role.name.clone(),
            permissions: Self::picker(available, selection),
        }
    }

    fn picker(
        available: Vec<Permission>,
        selection: AssociationSelection,
    ) -> MultiSelectAssociation<Permission> {
        MultiSelectAssociation::new(available)
            .with_selection(selection)
            .with_style(SummaryStyle::Count)
            .with_placeholder("No permissions")
    }

    pub fn is_new(&self) -> bool {
        self.role_id.is_none()
    }

    pub fn permissions(&self) -> &MultiSelectAssociation<Permission> {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut MultiSelectAssociation<Permission> {
        &mut self.permissions
    }

    pub fn build(&self) -> Result<RolePayload, EditorError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EditorError::MissingName);
        }
        Ok(RolePayload {
            role_id: self.role_id.clone(),
            name: name.to_string(),
            permission_ids: self.permissions.selected_ids(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub contact_id: Option<String>,
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_id: Option<String>,
}

impl ContactDraft {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            contact_id: Some(contact.id.clone()),
            user_id: None,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company_id: contact.company_id.clone(),
        }
    }

    pub fn build(&self) -> Result<ContactPayload, EditorError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EditorError::MissingName);
        }
        let email = EmailAddress::parse(&self.email).map_err(EditorError::InvalidEmail)?;
        Ok(ContactPayload {
            contact_id: self.contact_id.clone(),
            user_id: self.user_id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            phone: self.phone.clone().filter(|p| !p.trim().is_empty()),
            company_id: self.company_id.clone(),
        })
    }
}

/// Companies are edited in local state only
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanyDraft {
    pub id: Option<String>,
    pub name: String,
}

impl CompanyDraft {
    pub fn build(&self) -> Result<Company, EditorError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EditorError::MissingName);
        }
        Ok(Company {
            id: self.id.clone().unwrap_or_else(|| FieldId::temporary().to_string()),
            name: name.to_string(),
        })
    }
}

// =============================================================================
// Parent list merge
// =============================================================================

/// Anything with a stable record id
pub trait Record {
    fn record_id(&self) -> &str;
}

impl Record for Company { fn record_id(&self) -> &str { &self.id } }
impl Record for Contact { fn record_id(&self) -> &str { &self.id } }
impl Record for Role { fn record_id(&self) -> &str { &self.id } }
impl Record for DocTypeSummary { fn record_id(&self) -> &str { &self.id } }
impl Record for DocumentSummary { fn record_id(&self) -> &str { &self.id } }

/// Replace the entry with the same id, or prepend. Last write wins.
pub fn merge_record<T: Record>(list: &mut Vec<T>, record: T) {
    match list.iter().position(|r| r.record_id() == record.record_id()) {
        Some(index) => list[index] = record,
        None => list.insert(0, record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FieldDefinition;

    #[test]
    fn test_doc_type_requires_name() {
        let editor = DocTypeEditor::new("  ");
        assert_eq!(editor.build().unwrap_err(), DocTypeError::MissingName);
    }

    #[test]
    fn test_duplicate_field_names_block_save() {
        let mut editor = DocTypeEditor::new("Invoice");
        editor.add_field("Total", FieldTypeId::Currency);
        editor.add_field(" total ", FieldTypeId::Decimal);
        assert_eq!(
            editor.build().unwrap_err(),
            DocTypeError::DuplicateFieldName("total".into())
        );
    }

    #[test]
    fn test_unnamed_field_blocks_save() {
        let mut editor = DocTypeEditor::new("Invoice");
        editor.add_field("Total", FieldTypeId::Currency);
        editor.add_field("", FieldTypeId::Date);
        assert_eq!(editor.build().unwrap_err(), DocTypeError::UnnamedField { position: 1 });
    }

    #[test]
    fn test_empty_enumeration_warns() {
        let mut editor = DocTypeEditor::new("Paint");
        let id = editor.add_field("Color", FieldTypeId::Enumeration);
        let (draft, warnings) = editor.build().unwrap();
        assert_eq!(warnings, vec![Warning::EmptyEnumeration("Color".into())]);
        assert!(draft.fields[0].specific_values.is_empty());
        assert!(draft.fields[0].id.is_none());

        let row = editor.field_mut(&id).unwrap().options_mut();
        let first = row.entries()[0].id;
        row.update(first, "Red");
        row.add();
        let (draft, warnings) = editor.build().unwrap();
        assert!(warnings.is_empty());
        assert_eq!(draft.fields[0].specific_values.len(), 1);
    }

    #[test]
    fn test_from_schema_keeps_ids_and_options() {
        let schema = DocumentTypeSchema::new(
            "dt-3",
            "Paint",
            vec![
                FieldDefinition::new("f1", "Color", FieldTypeId::Enumeration)
                    .with_options(["Red", "Green"]),
                FieldDefinition::new("f2", "Notes", FieldTypeId::LongText),
            ],
        );
        let mut editor = DocTypeEditor::from_schema(&schema);
        assert!(!editor.is_new());
        assert!(editor.remove_field(&FieldId::new("f2")));

        let (draft, _) = editor.build().unwrap();
        assert_eq!(draft.id.as_deref(), Some("dt-3"));
        assert_eq!(draft.fields.len(), 1);
        assert_eq!(draft.fields[0].id.as_deref(), Some("f1"));
        let values: Vec<_> = draft.fields[0]
            .specific_values
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(values, vec!["Red", "Green"]);
    }

    #[test]
    fn test_role_editor() {
        let permissions = vec![
            Permission { id: "p1".into(), name: "read".into() },
            Permission { id: "p2".into(), name: "write".into() },
        ];
        let role = Role {
            id: "r1".into(),
            name: "Editor".into(),
            permission_ids: vec!["p1".into()],
        };
        let mut editor = RoleEditor::from_role(&role, permissions);
        editor.permissions_mut().toggle("p2");
        let payload = editor.build().unwrap();
        assert_eq!(payload.role_id.as_deref(), Some("r1"));
        assert_eq!(payload.permission_ids, vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(editor.permissions().summary(), "2 selected");

        editor.name = " ".into();
        assert_eq!(editor.build(), Err(EditorError::MissingName));
    }

    #[test]
    fn test_contact_email_is_validated() {
        let draft = ContactDraft { name: "Ana".into(), email: "ana".into(), ..Default::default() };
        assert!(matches!(draft.build(), Err(EditorError::InvalidEmail(_))));

        let draft = ContactDraft {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(draft.build().unwrap().phone, None);
    }

    #[test]
    fn test_merge_replaces_or_prepends() {
        let mut list = vec![Company { id: "1".into(), name: "Acme".into() }];
        merge_record(&mut list, Company { id: "2".into(), name: "Globex".into() });
        merge_record(&mut list, Company { id: "1".into(), name: "Acme Corp".into() });
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "2");
        assert_eq!(list[1].name, "Acme Corp");
    }

    #[test]
    fn test_company_draft_gets_local_id() {
        let company = CompanyDraft { id: None, name: "Initech".into() }.build().unwrap();
        assert!(company.id.starts_with("tmp-"));
    }
}
