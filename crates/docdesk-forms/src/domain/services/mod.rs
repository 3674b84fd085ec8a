//! Domain services
//!
//! Stateless rules and small stateful editors operating on the aggregates.

pub mod association;
pub mod document_query;
pub mod enum_options;
pub mod form_engine;
pub mod widget;

pub use association::{
    AssociationOption, AssociationSelection, AssociationView, MultiSelectAssociation, OptionRow,
    SummaryStyle,
};
pub use document_query::{DocumentQuery, SortDirection, SortKey};
pub use enum_options::{CommitOutcome, EnumEntry, EnumOptionsEditor, StoredOption};
pub use form_engine::{FieldEntry, FormEngine, FormMode, FormState, Rejection};
pub use widget::WidgetError;
