//! Infrastructure layer
//!
//! Adapters for the outbound ports. The HTTP backend lives in `docdesk-sdk`.

pub mod memory;

pub use memory::InMemoryBackend;
