//! # cd-01-state-store
//!
//! State Store Client subsystem for ClassDraw.
//!
//! ## Role in System
//!
//! - **Fail-Open Reads**: `read_state` / `read_config` always produce a usable
//!   document, falling back to defaults when the store misbehaves
//! - **Plain Writes**: `write_state` / `write_config` overwrite and report success
//! - **Commit Support**: strict version reads and, where the backend offers one,
//!   a true conditional write for the Draw Engine's commit step
//!
//! ## Backends
//!
//! ```text
//!                    StateStoreClient
//!                           │
//!                  Arc<dyn DocumentStore>
//!                           │
//!        ┌──────────────────┼────────────────────┐
//!        ↓                  ↓                    ↓
//! MemoryDocumentStore  HttpDocumentStore  CompositeDocumentStore
//!   (per-key lock)     (REST JSON docs)    (priority fallback,
//!                                            write-to-all)
//! ```
//!
//! The Draw Engine never learns how many physical backends exist; it only
//! talks to `StateStoreClient`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::StateStoreClient;
