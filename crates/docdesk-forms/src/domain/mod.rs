//! Domain module
//!
//! Field types, schemas and the rules that turn a schema into a form.

pub mod aggregates;
pub mod value_objects;
pub mod services;

pub use aggregates::*;
pub use value_objects::*;
pub use services::*;
