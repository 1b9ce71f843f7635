use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use shared_types::LotteryState;

use crate::domain::{CasOutcome, StoreError};
use crate::ports::DocumentStore;

/// In-memory implementation of DocumentStore.
///
/// Every operation takes the map lock, so a single get or put is atomic per
/// key just like a PUT against the remote store.
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Value>>,
    conditional_writes: bool,
}

impl MemoryDocumentStore {
    /// Store with a native conditional write.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            conditional_writes: true,
        }
    }

    /// Store that behaves like a plain REST document store (no compare-and-swap).
    pub fn without_conditional_writes() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            conditional_writes: false,
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.read();
        Ok(documents.get(key).filter(|doc| !doc.is_null()).cloned())
    }

    async fn put(&self, key: &str, document: &Value) -> Result<(), StoreError> {
        let mut documents = self.documents.write();
        documents.insert(key.to_string(), document.clone());
        Ok(())
    }

    fn supports_conditional_write(&self) -> bool {
        self.conditional_writes
    }

    async fn compare_and_put(
        &self,
        key: &str,
        expected_version: u64,
        document: &Value,
    ) -> Result<CasOutcome, StoreError> {
        if !self.conditional_writes {
            return Err(StoreError::Unsupported(self.name().to_string()));
        }

        let mut documents = self.documents.write();
        let found = LotteryState::version_of(documents.get(key));
        if found != expected_version {
            return Ok(CasOutcome::Conflict { found: Some(found) });
        }

        documents.insert(key.to_string(), document.clone());
        Ok(CasOutcome::Committed)
    }
}
