//! DocumentStore implementations.

pub mod composite;
pub mod http;
pub mod memory;

pub use composite::CompositeDocumentStore;
pub use http::{HttpDocumentStore, HttpStoreConfig};
pub use memory::MemoryDocumentStore;
