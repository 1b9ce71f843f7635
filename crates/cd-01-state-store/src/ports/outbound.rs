//! Outbound port: a key-value store of whole JSON documents.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CasOutcome, StoreError};

/// Remote (or local) store of JSON documents addressed by key.
///
/// A single `get` or `put` is atomic per document. Nothing spans documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs and errors.
    fn name(&self) -> &str;

    /// Fetch a document. `Ok(None)` when absent or stored as JSON `null`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite a document.
    async fn put(&self, key: &str, document: &Value) -> Result<(), StoreError>;

    /// Whether `compare_and_put` is backed by a real conditional write.
    fn supports_conditional_write(&self) -> bool {
        false
    }

    /// Write `document` only if the stored document's `version` equals
    /// `expected_version` (absent documents count as version 1).
    async fn compare_and_put(
        &self,
        key: &str,
        expected_version: u64,
        document: &Value,
    ) -> Result<CasOutcome, StoreError> {
        let _ = (key, expected_version, document);
        Err(StoreError::Unsupported(self.name().to_string()))
    }
}
