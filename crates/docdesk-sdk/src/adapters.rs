//! Response adapters
//!
//! The backend names the same value in several ways (`CompanyID`,
//! `companyId`, `id`, ...). Each function here maps one endpoint's JSON into
//! the canonical entity and is the only place that knows the alternatives.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use docdesk_forms::domain::value_objects::normalize_flag;
use docdesk_forms::{
    Company, Contact, DocTypeSummary, Document, DocumentSummary, DocumentTypeSchema, EnumOption,
    FieldDefinition, FieldTypeId, Permission, Role, StoredValues, User,
};

use crate::error::Error;
use crate::Result;

const LIST_WRAPPERS: [&str; 4] = ["items", "rows", "data", "results"];

/// First present, non-null value among `keys`
pub fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| value.get(*k)).find(|v| !v.is_null())
}

/// Scalar as text; numbers are rendered without quotes
pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    pick(value, keys).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn require_string(value: &Value, keys: &[&str], entity: &str) -> Result<String> {
    pick_string(value, keys)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MalformedBody(format!("{} without {}", entity, keys.join("/"))))
}

fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    pick(value, keys).and_then(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Ids from an array of scalars or of objects carrying one of `keys`
fn pick_ids(value: &Value, list_keys: &[&str], id_keys: &[&str]) -> Vec<String> {
    let Some(Value::Array(items)) = pick(value, list_keys) else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(_) => pick_string(item, id_keys),
            _ => None,
        })
        .collect()
}

/// A list body: a bare array or an object wrapping one
pub fn list<T>(value: &Value, adapt: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => match pick(value, &LIST_WRAPPERS) {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::MalformedBody("expected a list".into())),
        },
        _ => return Err(Error::MalformedBody("expected a list".into())),
    };
    items.iter().map(adapt).collect()
}

const COMPANY_ID: [&str; 5] = ["CompanyID", "companyId", "companyID", "id", "_id"];

pub fn company(value: &Value) -> Result<Company> {
    Ok(Company {
        id: require_string(value, &COMPANY_ID, "company")?,
        name: pick_string(value, &["CompanyName", "companyName", "name", "Name"])
            .unwrap_or_default(),
    })
}

pub fn contact(value: &Value) -> Result<Contact> {
    Ok(Contact {
        id: require_string(
            value,
            &["ContactID", "contactId", "contactID", "id", "_id"],
            "contact",
        )?,
        name: pick_string(value, &["ContactName", "contactName", "name", "Name"])
            .unwrap_or_default(),
        email: pick_string(value, &["Email", "email", "mail"]).unwrap_or_default(),
        phone: pick_string(value, &["Phone", "phone", "telefono"]).filter(|p| !p.is_empty()),
        company_id: pick_string(value, &["CompanyID", "companyId", "companyID"]),
    })
}

pub fn permission(value: &Value) -> Result<Permission> {
    Ok(Permission {
        id: require_string(
            value,
            &["PermissionID", "permissionId", "permissionID", "id"],
            "permission",
        )?,
        name: pick_string(value, &["PermissionName", "permissionName", "name", "Name"])
            .unwrap_or_default(),
    })
}

pub fn role(value: &Value) -> Result<Role> {
    Ok(Role {
        id: require_string(value, &["RoleID", "roleId", "roleID", "id"], "role")?,
        name: pick_string(value, &["RoleName", "roleName", "name", "Name"]).unwrap_or_default(),
        permission_ids: pick_ids(
            value,
            &["permissionIds", "PermissionIDs", "permissions", "Permissions"],
            &["PermissionID", "permissionId", "id"],
        ),
    })
}

/// Users carry `userId`, `id`, or both; `userId` wins
pub fn user(value: &Value) -> Result<User> {
    let user_id = pick_string(value, &["userId", "UserID", "userID"]);
    let plain_id = pick_string(value, &["id", "_id"]);
    let (id, alternate_id) = match (user_id, plain_id) {
        (Some(user_id), Some(plain)) if plain != user_id => (user_id, Some(plain)),
        (Some(user_id), _) => (user_id, None),
        (None, Some(plain)) => (plain, None),
        (None, None) => return Err(Error::MalformedBody("user without userId/id".into())),
    };
    Ok(User {
        id,
        alternate_id,
        name: pick_string(value, &["UserName", "userName", "name", "fullName", "Name"])
            .unwrap_or_default(),
        email: pick_string(value, &["Email", "email"]),
    })
}

const DOC_TYPE_ID: [&str; 5] = ["DocTypeID", "docTypeId", "docTypeID", "typeId", "id"];

pub fn doc_type_summary(value: &Value) -> Result<DocTypeSummary> {
    Ok(DocTypeSummary {
        id: require_string(value, &DOC_TYPE_ID, "document type")?,
        name: pick_string(value, &["DocTypeName", "docTypeName", "name", "Name"])
            .unwrap_or_default(),
        alias: pick_string(value, &["Alias", "alias"]).unwrap_or_default(),
        description: pick_string(value, &["Description", "description"]).unwrap_or_default(),
    })
}

pub fn field_definition(value: &Value) -> Result<FieldDefinition> {
    let id = require_string(value, &["FieldID", "fieldId", "fieldID", "id"], "field")?;
    let name = pick_string(value, &["FieldName", "fieldName", "name", "Name"]).unwrap_or_default();
    let type_code = pick_string(value, &["typeId", "TypeID", "typeID", "fieldType", "type"])
        .unwrap_or_default();

    let mut field = FieldDefinition::new(id, name, FieldTypeId::from_code(&type_code));
    field.length = pick_u32(value, &["length", "Length", "maxLength"]);
    field.precision = pick_u32(value, &["precision", "Precision"]);
    field.is_required =
        pick(value, &["isRequired", "IsRequired", "required"]).is_some_and(normalize_flag);
    field.specific_values = match pick(value, &["specificValues", "SpecificValues", "options"]) {
        Some(Value::Array(items)) => items.iter().filter_map(enum_option).collect(),
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(|v| v.as_array().map(|items| items.iter().filter_map(enum_option).collect()))
            .unwrap_or_default(),
        _ => vec![],
    };
    Ok(field)
}

fn enum_option(value: &Value) -> Option<EnumOption> {
    match value {
        Value::String(s) => Some(EnumOption::new(s.clone())),
        Value::Object(_) => pick_string(value, &["value", "Value"]).map(EnumOption::new),
        _ => None,
    }
}

pub fn doc_type_schema(value: &Value) -> Result<DocumentTypeSchema> {
    let summary = doc_type_summary(value)?;
    let fields = match pick(value, &["fields", "Fields", "docTypeFields"]) {
        Some(fields) => list(fields, field_definition)?,
        None => vec![],
    };
    Ok(DocumentTypeSchema::new(summary.id, summary.name, fields)
        .with_alias(summary.alias)
        .with_description(summary.description))
}

const DOCUMENT_ID: [&str; 5] = ["DocumentID", "documentId", "documentID", "id", "_id"];
const FILE_NAME: [&str; 4] = ["FileName", "fileName", "file_name", "originalName"];
const VALUE_KEY: [&str; 6] = ["fieldId", "FieldID", "fieldID", "id", "name", "fieldName"];

/// Stored values as an object keyed by field id or name, or a list of
/// `{fieldId, value}` entries
fn stored_values(value: &Value) -> StoredValues {
    match pick(value, &["fields", "values", "Fields", "fieldValues"]) {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| {
                let key = pick_string(entry, &VALUE_KEY)?;
                let v = pick(entry, &["value", "Value"]).cloned().unwrap_or(Value::Null);
                Some((key, v))
            })
            .collect(),
        _ => StoredValues::new(),
    }
}

pub fn document(value: &Value) -> Result<Document> {
    Ok(Document {
        id: require_string(value, &DOCUMENT_ID, "document")?,
        type_id: pick_string(value, &["DocTypeID", "docTypeId", "docTypeID", "typeId"])
            .unwrap_or_default(),
        file_name: pick_string(value, &FILE_NAME),
        values: stored_values(value),
        company_ids: pick_ids(
            value,
            &["companyIds", "CompanyIDs", "companies", "Companies"],
            &COMPANY_ID,
        ),
    })
}

pub fn document_summary(value: &Value) -> Result<DocumentSummary> {
    let file_name = pick_string(value, &FILE_NAME);
    let name = pick_string(
        value,
        &["DocumentName", "documentName", "Nombre del Documento", "name", "Name"],
    )
        .or_else(|| file_name.clone())
        .unwrap_or_default();
    Ok(DocumentSummary {
        id: require_string(value, &DOCUMENT_ID, "document")?,
        type_id: pick_string(value, &["DocTypeID", "docTypeId", "docTypeID", "typeId"])
            .unwrap_or_default(),
        name,
        file_name,
        created_at: pick_string(value, &["createdAt", "CreatedAt", "created_at", "dateCreated"])
            .and_then(|raw| parse_timestamp(&raw)),
    })
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date, read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdesk_forms::FieldId;
    use serde_json::json;

    #[test]
    fn test_company_accepts_both_spellings() {
        let a = company(&json!({"CompanyID": 4, "CompanyName": "Acme"})).unwrap();
        let b = company(&json!({"companyId": "4", "name": "Acme"})).unwrap();
        assert_eq!(a, b);
        assert!(company(&json!({"name": "Nameless"})).is_err());
    }

    #[test]
    fn test_list_shapes() {
        let bare = list(&json!([{"id": 1}, {"id": 2}]), company).unwrap();
        let wrapped = list(&json!({"items": [{"id": 1}, {"id": 2}]}), company).unwrap();
        assert_eq!(bare, wrapped);
        assert!(list(&json!("nope"), company).is_err());
    }

    #[test]
    fn test_user_ids() {
        let both = user(&json!({"userId": "u1", "id": "42", "name": "Ana"})).unwrap();
        assert_eq!(both.id, "u1");
        assert_eq!(both.alternate_id.as_deref(), Some("42"));

        let only_id = user(&json!({"id": 42})).unwrap();
        assert_eq!(only_id.id, "42");
        assert_eq!(only_id.alternate_id, None);
    }

    #[test]
    fn test_role_permissions_from_objects_or_ids() {
        let from_ids =
            role(&json!({"roleId": 1, "roleName": "Admin", "permissionIds": [1, "2"]})).unwrap();
        let from_objects = role(&json!({
            "RoleID": 1,
            "RoleName": "Admin",
            "permissions": [{"PermissionID": 1}, {"id": 2}]
        }))
        .unwrap();
        assert_eq!(from_ids, from_objects);
        assert_eq!(from_ids.permission_ids, vec!["1", "2"]);
    }

    #[test]
    fn test_schema_with_loose_fields() {
        let schema = doc_type_schema(&json!({
            "DocTypeID": 3,
            "name": "Paint",
            "fields": [
                {"FieldID": 10, "FieldName": "Color", "typeId": 9, "isRequired": "1",
                 "specificValues": [{"value": "Red"}, "Green"]},
                {"fieldId": "11", "name": "Notes", "type": "texto largo", "length": "200"},
                {"id": 12, "name": "Serial", "typeId": "mystery"}
            ]
        }))
        .unwrap();

        assert_eq!(schema.id, "3");
        let color = schema.field(&FieldId::new("10")).unwrap();
        assert_eq!(color.type_id, FieldTypeId::Enumeration);
        assert!(color.is_required);
        assert_eq!(color.option_values().collect::<Vec<_>>(), vec!["Red", "Green"]);

        let notes = schema.field_by_name("notes").unwrap();
        assert_eq!(notes.type_id, FieldTypeId::LongText);
        assert_eq!(notes.length, Some(200));

        let serial = schema.field_by_name("Serial").unwrap();
        assert_eq!(serial.type_id, FieldTypeId::Unrecognized("mystery".into()));
    }

    #[test]
    fn test_document_values_as_map_or_entries() {
        let from_map = document(&json!({
            "documentId": "d1", "docTypeId": "3",
            "fields": {"10": "Red"},
            "companies": [{"CompanyID": 4}]
        }))
        .unwrap();
        let from_entries = document(&json!({
            "DocumentID": "d1", "DocTypeID": 3,
            "fields": [{"fieldId": 10, "value": "Red"}],
            "companyIds": ["4"]
        }))
        .unwrap();
        assert_eq!(from_map, from_entries);
        assert_eq!(from_map.values.lookup(&FieldId::new("10"), "Color"), Some(&json!("Red")));
    }

    #[test]
    fn test_document_summary_dates() {
        let summary = document_summary(&json!({
            "id": 1,
            "fileName": "a.pdf",
            "createdAt": "2024-03-01 10:00:00"
        }))
        .unwrap();
        assert_eq!(summary.name, "a.pdf");
        assert_eq!(summary.created_at.unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");

        assert!(parse_timestamp("2024-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
