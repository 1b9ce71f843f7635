use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared_types::LotteryState;
use tracing::{debug, warn};

use crate::domain::StoreError;
use crate::ports::DocumentStore;

/// Replicating store over several backends in priority order.
///
/// Reads ask every member and return the document with the highest `version`;
/// priority order only breaks ties. A member that missed writes while it was
/// unreachable therefore never shadows a newer copy held by another member.
/// Writes go to every member and succeed when at least one accepted the
/// document, which also brings lagging members back in line.
/// Conditional writes are not offered: members cannot be swapped atomically
/// as a group.
pub struct CompositeDocumentStore {
    members: Vec<Arc<dyn DocumentStore>>,
}

impl CompositeDocumentStore {
    pub fn new(members: Vec<Arc<dyn DocumentStore>>) -> Self {
        Self { members }
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }
}

#[async_trait]
impl DocumentStore for CompositeDocumentStore {
    fn name(&self) -> &str {
        "composite"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut newest: Option<(u64, Value, &str)> = None;
        let mut answered = false;
        let mut last_error = None;

        for member in &self.members {
            match member.get(key).await {
                Ok(Some(document)) => {
                    answered = true;
                    let version = LotteryState::version_of(Some(&document));
                    let newer = newest
                        .as_ref()
                        .map_or(true, |(best, _, _)| version > *best);
                    if newer {
                        newest = Some((version, document, member.name()));
                    }
                }
                Ok(None) => answered = true,
                Err(e) => {
                    warn!(key, backend = member.name(), error = %e, "Backend read failed");
                    last_error = Some(e);
                }
            }
        }

        if let Some((version, document, backend)) = newest {
            debug!(key, backend, version, "Document read");
            return Ok(Some(document));
        }
        if answered {
            return Ok(None);
        }
        Err(last_error.unwrap_or_else(|| StoreError::AllBackendsFailed(key.to_string())))
    }

    async fn put(&self, key: &str, document: &Value) -> Result<(), StoreError> {
        let mut saved = 0usize;

        for member in &self.members {
            match member.put(key, document).await {
                Ok(()) => saved += 1,
                Err(e) => {
                    warn!(key, backend = member.name(), error = %e, "Backend write failed");
                }
            }
        }

        debug!(key, saved, total = self.members.len(), "Replicated write finished");
        if saved == 0 {
            return Err(StoreError::AllBackendsFailed(key.to_string()));
        }
        Ok(())
    }
}
