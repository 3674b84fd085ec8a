//! DocDesk Rust SDK
//!
//! Async client for the DocDesk document management API, plus the
//! [`HttpBackend`] that plugs it into `docdesk-forms`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docdesk_forms::{DeskService, DeskUseCases};
//! use docdesk_sdk::{AuthContext, Client, ClientConfig, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     AuthContext::global().init("session-token");
//!     let client = Client::new(ClientConfig::default())?;
//!     let desk = DeskService::new(Arc::new(HttpBackend::new(client)));
//!
//!     for doc_type in desk.list_doc_types().await? {
//!         println!("{} {}", doc_type.id, doc_type.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod auth;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod services;

pub use auth::AuthContext;
pub use backend::HttpBackend;
pub use client::{Client, FilePart};
pub use config::{ClientConfig, Environment, DEFAULT_TIMEOUT};
pub use error::Error;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for DocDesk SDK operations
pub type Result<T> = std::result::Result<T, Error>;
