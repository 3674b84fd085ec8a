//! Client-side filtering and sorting of document lists

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::aggregates::DocumentSummary;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Created,
    Id,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub search: Option<String>,
    pub type_id: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    pub fn of_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    pub fn sort_by(mut self, sort: SortKey, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn matches(&self, doc: &DocumentSummary) -> bool {
        if let Some(type_id) = &self.type_id {
            if &doc.type_id != type_id {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.trim().to_lowercase();
                doc.name.to_lowercase().contains(&term)
                    || doc
                        .file_name
                        .as_deref()
                        .map(|f| f.to_lowercase().contains(&term))
                        .unwrap_or(false)
            }
            None => true,
        }
    }

    /// Filtered, stably sorted copy of the list
    pub fn apply(&self, docs: &[DocumentSummary]) -> Vec<DocumentSummary> {
        let mut out: Vec<DocumentSummary> =
            docs.iter().filter(|d| self.matches(d)).cloned().collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    fn compare(&self, a: &DocumentSummary, b: &DocumentSummary) -> Ordering {
        let ordering = match self.sort {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Id => compare_ids(&a.id, &b.id),
            SortKey::Created => match (a.created_at, b.created_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                // undated rows stay at the bottom in either direction
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Numeric ids first in numeric order, then the rest lexically
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(id: &str, name: &str, day: Option<u32>) -> DocumentSummary {
        DocumentSummary {
            id: id.into(),
            type_id: if id == "3" { "other".into() } else { "t".into() },
            name: name.into(),
            file_name: Some(format!("{}.pdf", name.to_lowercase())),
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()),
        }
    }

    fn docs() -> Vec<DocumentSummary> {
        vec![
            doc("10", "beta", Some(3)),
            doc("9", "Alpha", None),
            doc("3", "Gamma", Some(1)),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let result = DocumentQuery::new().search("ALP").apply(&docs());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "9");
    }

    #[test]
    fn test_search_matches_file_name() {
        let result = DocumentQuery::new().search("gamma.pdf").apply(&docs());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(DocumentQuery::new().search("  ").apply(&docs()).len(), 3);
    }

    #[test]
    fn test_type_filter() {
        let result = DocumentQuery::new().of_type("t").apply(&docs());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_sort_by_id_numeric() {
        let result = DocumentQuery::new()
            .sort_by(SortKey::Id, SortDirection::Ascending)
            .apply(&docs());
        let ids: Vec<_> = result.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "9", "10"]);
    }

    #[test]
    fn test_sort_by_created_keeps_undated_last() {
        let asc = DocumentQuery::new()
            .sort_by(SortKey::Created, SortDirection::Ascending)
            .apply(&docs());
        let ids: Vec<_> = asc.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "10", "9"]);

        let desc = DocumentQuery::new()
            .sort_by(SortKey::Created, SortDirection::Descending)
            .apply(&docs());
        let ids: Vec<_> = desc.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "3", "9"]);
    }

    #[test]
    fn test_sort_by_name_descending() {
        let result = DocumentQuery::new()
            .sort_by(SortKey::Name, SortDirection::Descending)
            .apply(&docs());
        let names: Vec<_> = result.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "beta", "Alpha"]);
    }

    #[test]
    fn test_sort_by_id_with_mixed_ids() {
        assert_eq!(compare_ids("2", "10"), Ordering::Less);
        assert_eq!(compare_ids("10", "1a"), Ordering::Less);
        assert_eq!(compare_ids("1a", "2"), Ordering::Greater);
        assert_eq!(compare_ids("007", "7"), Ordering::Less);

        let docs: Vec<DocumentSummary> = (0..200)
            .map(|i| {
                let id = if i % 3 == 0 { format!("{}a", i) } else { i.to_string() };
                doc(&id, "Doc", None)
            })
            .collect();
        let sorted = DocumentQuery::new()
            .sort_by(SortKey::Id, SortDirection::Ascending)
            .apply(&docs);
        assert_eq!(sorted.len(), 200);

        let ids: Vec<&str> = sorted.iter().map(|d| d.id.as_str()).collect();
        let first_text = ids.iter().position(|id| id.parse::<u64>().is_err()).unwrap();
        assert!(ids[..first_text].iter().all(|id| id.parse::<u64>().is_ok()));
        assert!(ids[first_text..].iter().all(|id| id.parse::<u64>().is_err()));
        assert_eq!(&ids[..3], &["1", "2", "4"]);
        assert!(ids[first_text..].windows(2).all(|w| w[0] <= w[1]));
    }
}
