//! Options editor for enumeration fields

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::EnumOption;

/// Option as the backend may store it: a bare string or `{ "value": ... }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredOption {
    Plain(String),
    Object { value: String },
}

impl StoredOption {
    pub fn into_value(self) -> String {
        match self {
            Self::Plain(value) | Self::Object { value } => value,
        }
    }
}

impl From<EnumOption> for StoredOption {
    fn from(option: EnumOption) -> Self {
        Self::Object { value: option.value }
    }
}

/// Editable row; the id only keys the row while editing and is never saved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumEntry {
    pub id: Uuid,
    pub value: String,
}

impl EnumEntry {
    fn blank() -> Self {
        Self { id: Uuid::new_v4(), value: String::new() }
    }
}

/// Result of committing the editor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    pub options: Vec<EnumOption>,
    /// Set when no option survived; the empty list is still accepted
    pub empty_warning: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumOptionsEditor {
    entries: Vec<EnumEntry>,
}

impl Default for EnumOptionsEditor {
    fn default() -> Self {
        Self { entries: vec![EnumEntry::blank()] }
    }
}

impl EnumOptionsEditor {
    /// Load stored options, preserving order. Empty input yields one blank row.
    pub fn normalize<I>(stored: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StoredOption>,
    {
        let entries: Vec<EnumEntry> = stored
            .into_iter()
            .map(|option| EnumEntry { id: Uuid::new_v4(), value: option.into().into_value() })
            .collect();

        if entries.is_empty() {
            Self::default()
        } else {
            Self { entries }
        }
    }

    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.value.as_str())
    }

    /// Append a blank row and return its id
    pub fn add(&mut self) -> Uuid {
        let entry = EnumEntry::blank();
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Returns false when no row has that id
    pub fn update(&mut self, id: Uuid, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Options to save: whitespace-only rows dropped, duplicates kept
    pub fn commit(&self) -> CommitOutcome {
        let options: Vec<EnumOption> = self
            .entries
            .iter()
            .filter(|e| !e.value.trim().is_empty())
            .map(|e| EnumOption::new(e.value.clone()))
            .collect();

        if options.is_empty() {
            tracing::warn!("enumeration committed without any option");
        }

        CommitOutcome { empty_warning: options.is_empty(), options }
    }
}

impl From<&str> for StoredOption {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for StoredOption {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_both_shapes() {
        let plain = EnumOptionsEditor::normalize(["A", "B"]);
        let objects: Vec<StoredOption> = serde_json::from_value(serde_json::json!([
            {"value": "A"},
            {"value": "B"}
        ]))
        .unwrap();
        let objects = EnumOptionsEditor::normalize(objects);

        assert_eq!(plain.values().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(objects.values().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_ne!(plain.entries()[0].id, objects.entries()[0].id);
    }

    #[test]
    fn test_empty_input_yields_blank_row() {
        let editor = EnumOptionsEditor::normalize(Vec::<StoredOption>::new());
        assert_eq!(editor.entries().len(), 1);
        assert_eq!(editor.entries()[0].value, "");
    }

    #[test]
    fn test_commit_drops_whitespace_entries() {
        let editor = EnumOptionsEditor::normalize([" ", "X"]);
        let outcome = editor.commit();
        assert_eq!(outcome.options, vec![EnumOption::new("X")]);
        assert!(!outcome.empty_warning);
    }

    #[test]
    fn test_commit_keeps_duplicates() {
        let editor = EnumOptionsEditor::normalize(["X", "X"]);
        assert_eq!(editor.commit().options.len(), 2);
    }

    #[test]
    fn test_empty_commit_warns_but_is_accepted() {
        let editor = EnumOptionsEditor::default();
        let outcome = editor.commit();
        assert!(outcome.options.is_empty());
        assert!(outcome.empty_warning);
    }

    #[test]
    fn test_add_update_remove() {
        let mut editor = EnumOptionsEditor::normalize(["Red"]);
        let id = editor.add();
        assert!(editor.update(id, "Blue"));
        assert_eq!(editor.values().collect::<Vec<_>>(), vec!["Red", "Blue"]);

        let first = editor.entries()[0].id;
        assert!(editor.remove(first));
        assert!(!editor.remove(first));
        assert!(!editor.update(first, "gone"));
        assert_eq!(editor.values().collect::<Vec<_>>(), vec!["Blue"]);
    }
}
