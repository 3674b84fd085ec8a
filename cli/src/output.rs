//! Output formatting

use clap::ValueEnum;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use docdesk_forms::{
    Company, Contact, DocTypeSummary, DocumentSummary, FieldDefinition, FieldValue, Permission,
    Role, User,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(raw, true).ok()
    }

    /// Print a list: rows as a table, or the serialized rows
    pub fn print_rows<T: Serialize + Tabled>(&self, rows: &[T]) -> anyhow::Result<()> {
        match self {
            OutputFormat::Table if rows.is_empty() => println!("(none)"),
            OutputFormat::Table => println!("{}", Table::new(rows).with(Style::rounded())),
            _ => self.print(&rows)?,
        }
        Ok(())
    }

    /// Print one record; tables show it as key/value pairs
    pub fn print<T: Serialize + ?Sized>(&self, data: &T) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Table => {
                let value = serde_json::to_value(data)?;
                match value.as_object() {
                    Some(map) => {
                        let pairs: Vec<KeyValueRow> = map
                            .iter()
                            .filter(|(_, v)| !v.is_array() && !v.is_object())
                            .map(|(k, v)| KeyValueRow { key: k.clone(), value: scalar(v) })
                            .collect();
                        println!("{}", Table::new(pairs).with(Style::rounded()));
                    }
                    None => println!("{}", serde_json::to_string_pretty(&value)?),
                }
            }
        }
        Ok(())
    }
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[derive(Tabled, Serialize)]
pub struct KeyValueRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled, Serialize)]
pub struct DocTypeRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Alias")]
    pub alias: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&DocTypeSummary> for DocTypeRow {
    fn from(t: &DocTypeSummary) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            alias: t.alias.clone(),
            description: t.description.clone(),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub type_id: String,
    #[tabled(rename = "Length")]
    pub length: String,
    #[tabled(rename = "Required")]
    pub required: bool,
    #[tabled(rename = "Options")]
    pub options: String,
}

impl From<&FieldDefinition> for FieldRow {
    fn from(f: &FieldDefinition) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            type_id: f.type_id.to_string(),
            length: f.max_length().map(|l| l.to_string()).unwrap_or_default(),
            required: f.is_required,
            options: f.option_values().collect::<Vec<_>>().join(", "),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct ValueRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Required")]
    pub required: bool,
}

impl ValueRow {
    pub fn new(field: &FieldDefinition, value: Option<&FieldValue>) -> Self {
        Self {
            field: field.name.clone(),
            value: value.map(FieldValue::display).unwrap_or_default(),
            required: field.is_required,
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct DocumentRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "File")]
    pub file_name: String,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&DocumentSummary> for DocumentRow {
    fn from(d: &DocumentSummary) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            file_name: opt(&d.file_name),
            created_at: d
                .created_at
                .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct CompanyRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&Company> for CompanyRow {
    fn from(c: &Company) -> Self {
        Self { id: c.id.clone(), name: c.name.clone() }
    }
}

impl From<&Permission> for CompanyRow {
    fn from(p: &Permission) -> Self {
        Self { id: p.id.clone(), name: p.name.clone() }
    }
}

#[derive(Tabled, Serialize)]
pub struct ContactRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[tabled(rename = "Company")]
    pub company_id: String,
}

impl From<&Contact> for ContactRow {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            email: c.email.clone(),
            phone: opt(&c.phone),
            company_id: opt(&c.company_id),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct RoleRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Permissions")]
    pub permissions: String,
}

impl RoleRow {
    /// Permission ids resolved to names where known
    pub fn new(role: &Role, permissions: &[Permission]) -> Self {
        let names: Vec<&str> = role
            .permission_ids
            .iter()
            .map(|id| {
                permissions
                    .iter()
                    .find(|p| &p.id == id)
                    .map(|p| p.name.as_str())
                    .unwrap_or(id.as_str())
            })
            .collect();
        Self { id: role.id.clone(), name: role.name.clone(), permissions: names.join(", ") }
    }
}

#[derive(Tabled, Serialize)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self { id: u.id.clone(), name: u.name.clone(), email: opt(&u.email) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn test_role_row_resolves_names() {
        let role = Role {
            id: "r1".into(),
            name: "Admin".into(),
            permission_ids: vec!["p1".into(), "p9".into()],
        };
        let permissions = vec![Permission { id: "p1".into(), name: "read".into() }];
        assert_eq!(RoleRow::new(&role, &permissions).permissions, "read, p9");
    }
}
