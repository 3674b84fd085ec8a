//! Application layer
//!
//! Modals, editors and the desk service.

pub mod commands;
pub mod dto;
pub mod editors;
pub mod modal;
pub mod send;

pub use commands::DeskService;
pub use editors::{
    merge_record, CompanyDraft, ContactDraft, DocTypeEditor, DocTypeError, EditorError, FieldDraft,
    Record, RoleEditor, Warning,
};
pub use modal::{DocumentModal, ModalError, ModalStatus};
pub use send::{SendDocumentsForm, SendError};
