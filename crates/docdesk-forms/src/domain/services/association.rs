//! Multi-select associations
//!
//! Links one document or role to several companies, users or permissions
//! through a checkbox dropdown.

use std::collections::HashSet;

use crate::domain::aggregates::{Company, Permission, Role, User};

/// Something that can be picked in a multi-select
pub trait AssociationOption {
    /// Canonical id stored in the selection
    fn option_id(&self) -> &str;

    fn label(&self) -> &str;

    /// Identity match used when toggling
    fn matches(&self, id: &str) -> bool {
        self.option_id() == id
    }
}

impl AssociationOption for Company {
    fn option_id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl AssociationOption for Permission {
    fn option_id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl AssociationOption for Role {
    fn option_id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl AssociationOption for User {
    fn option_id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn matches(&self, id: &str) -> bool {
        self.id == id || self.alternate_id.as_deref() == Some(id)
    }
}

/// Set of selected ids
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssociationSelection {
    ids: HashSet<String>,
}

impl AssociationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symmetric difference on membership; returns whether the id is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        self.ids.retain(|id| keep(id));
    }
}

impl<S: Into<String>> FromIterator<S> for AssociationSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { ids: iter.into_iter().map(Into::into).collect() }
    }
}

/// How the collapsed dropdown summarizes the selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummaryStyle {
    #[default]
    Count,
    Names,
}

/// One checkbox row of the expanded panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRow {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssociationView {
    Collapsed { summary: String },
    Expanded { rows: Vec<OptionRow> },
}

/// Checkbox dropdown over an option list
#[derive(Clone, Debug)]
pub struct MultiSelectAssociation<T> {
    options: Vec<T>,
    selection: AssociationSelection,
    expanded: bool,
    placeholder: String,
    style: SummaryStyle,
}

impl<T: AssociationOption> MultiSelectAssociation<T> {
    pub const DEFAULT_PLACEHOLDER: &'static str = "No selection";

    pub fn new(options: Vec<T>) -> Self {
        Self {
            options,
            selection: AssociationSelection::new(),
            expanded: false,
            placeholder: Self::DEFAULT_PLACEHOLDER.to_string(),
            style: SummaryStyle::default(),
        }
    }

    pub fn with_selection(mut self, selection: AssociationSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selection(&self) -> &AssociationSelection {
        &self.selection
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Toggle the option matching `option_id`.
    ///
    /// Returns `None` when no option matches; the selection is unchanged.
    /// Unchecking removes every selected id the option answers to.
    pub fn toggle(&mut self, option_id: &str) -> Option<bool> {
        let option = self.options.iter().find(|o| o.matches(option_id))?;
        if self.selection.iter().any(|id| option.matches(id)) {
            self.selection.retain(|id| !option.matches(id));
            Some(false)
        } else {
            Some(self.selection.toggle(option.option_id()))
        }
    }

    pub fn is_selected(&self, option: &T) -> bool {
        self.selection.iter().any(|id| option.matches(id))
    }

    /// Selected options in option-list order
    pub fn selected(&self) -> impl Iterator<Item = &T> {
        self.options.iter().filter(|o| self.is_selected(o))
    }

    /// Selected ids in option-list order, followed by ids no longer offered
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected().map(|o| o.option_id().to_string()).collect();
        let mut stale: Vec<String> = self
            .selection
            .iter()
            .filter(|id| !self.options.iter().any(|o| o.matches(id)))
            .map(String::from)
            .collect();
        stale.sort();
        ids.extend(stale);
        ids
    }

    /// Swap in a refetched option list. Selected ids are kept even when
    /// their option disappeared; see [`Self::prune_unavailable`].
    pub fn replace_options(&mut self, options: Vec<T>) {
        self.options = options;
    }

    /// Drop selected ids that no current option matches
    pub fn prune_unavailable(&mut self) -> usize {
        let before = self.selection.len();
        let options = &self.options;
        self.selection.retain(|id| options.iter().any(|o| o.matches(id)));
        before - self.selection.len()
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    pub fn toggle_panel(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Pointer event captured on the containing element; outside clicks collapse
    pub fn pointer_down(&mut self, inside: bool) {
        if !inside {
            self.expanded = false;
        }
    }

    pub fn summary(&self) -> String {
        let selected: Vec<&T> = self.selected().collect();
        if selected.is_empty() {
            return self.placeholder.clone();
        }
        match self.style {
            SummaryStyle::Count => format!("{} selected", selected.len()),
            SummaryStyle::Names => selected
                .iter()
                .map(|o| o.label())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn view(&self) -> AssociationView {
        if !self.expanded {
            return AssociationView::Collapsed { summary: self.summary() };
        }
        AssociationView::Expanded {
            rows: self
                .options
                .iter()
                .map(|o| OptionRow {
                    id: o.option_id().to_string(),
                    label: o.label().to_string(),
                    checked: self.is_selected(o),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companies() -> Vec<Company> {
        vec![
            Company { id: "1".into(), name: "Acme".into() },
            Company { id: "2".into(), name: "Globex".into() },
            Company { id: "3".into(), name: "Initech".into() },
        ]
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut assoc = MultiSelectAssociation::new(companies());
        assoc.toggle("2");
        let before = assoc.selection().clone();

        assert_eq!(assoc.toggle("1"), Some(true));
        assert_eq!(assoc.toggle("1"), Some(false));
        assert_eq!(assoc.selection(), &before);
    }

    #[test]
    fn test_selection_has_no_duplicates() {
        let mut selection = AssociationSelection::new();
        selection.toggle("a");
        let selection: AssociationSelection = selection.iter().chain(["a"]).collect();
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_summary_follows_option_order() {
        let mut assoc = MultiSelectAssociation::new(companies()).with_style(SummaryStyle::Names);
        assert_eq!(assoc.summary(), "No selection");
        assoc.toggle("3");
        assoc.toggle("1");
        assert_eq!(assoc.summary(), "Acme, Initech");

        let counted = assoc.clone().with_style(SummaryStyle::Count);
        assert_eq!(counted.summary(), "2 selected");
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let mut assoc = MultiSelectAssociation::new(companies());
        assert_eq!(assoc.toggle("99"), None);
        assert!(assoc.selection().is_empty());
    }

    #[test]
    fn test_users_match_either_id() {
        let users = vec![User {
            id: "7".into(),
            alternate_id: Some("u-7".into()),
            name: "Ana".into(),
            email: None,
        }];
        let mut assoc = MultiSelectAssociation::new(users);
        assert_eq!(assoc.toggle("7"), Some(true));
        assert_eq!(assoc.toggle("u-7"), Some(false));
        assert!(assoc.selection().is_empty());
    }

    #[test]
    fn test_user_selected_by_alternate_id_can_be_unchecked() {
        let users = vec![User {
            id: "7".into(),
            alternate_id: Some("u-7".into()),
            name: "Ana".into(),
            email: None,
        }];
        let mut assoc =
            MultiSelectAssociation::new(users).with_selection(["u-7"].into_iter().collect());
        assert_eq!(assoc.selected_ids(), vec!["7".to_string()]);

        assert_eq!(assoc.toggle("7"), Some(false));
        assert!(assoc.selection().is_empty());
        assert_eq!(assoc.selected().count(), 0);

        assert_eq!(assoc.toggle("u-7"), Some(true));
        assert!(assoc.selection().contains("7"));
        assert_eq!(assoc.selection().len(), 1);
    }

    #[test]
    fn test_stale_ids_are_kept_until_pruned() {
        let mut assoc = MultiSelectAssociation::new(companies());
        assoc.toggle("1");
        assoc.toggle("3");
        assoc.replace_options(companies().into_iter().take(2).collect());

        assert_eq!(assoc.selected_ids(), vec!["1".to_string(), "3".to_string()]);
        assert_eq!(assoc.prune_unavailable(), 1);
        assert_eq!(assoc.selected_ids(), vec!["1".to_string()]);
    }

    #[test]
    fn test_outside_click_collapses() {
        let mut assoc = MultiSelectAssociation::new(companies());
        assoc.expand();
        assoc.pointer_down(true);
        assert!(assoc.is_expanded());
        assoc.toggle("2");
        match assoc.view() {
            AssociationView::Expanded { rows } => {
                assert_eq!(rows.len(), 3);
                assert!(rows[1].checked);
                assert!(!rows[0].checked);
            }
            other => panic!("expected expanded view, got {:?}", other),
        }
        assoc.pointer_down(false);
        assert_eq!(assoc.view(), AssociationView::Collapsed { summary: "1 selected".into() });
    }
}
