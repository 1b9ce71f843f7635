//! State Store Client.
//!
//! Reads are fail-open: whatever goes wrong, callers get a usable document.
//! Writes report a plain success flag. Conflict detection is layered on top
//! by the Draw Engine using `read_version` / `write_state_if_version`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{LotteryConfig, LotteryState};
use tracing::{debug, warn};

use crate::domain::{CasOutcome, StoreError, StoreKeys};
use crate::ports::DocumentStore;

/// Typed access to the lottery state and configuration documents.
#[derive(Clone)]
pub struct StateStoreClient {
    store: Arc<dyn DocumentStore>,
    keys: StoreKeys,
}

impl StateStoreClient {
    pub fn new(store: Arc<dyn DocumentStore>, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    pub fn with_default_keys(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(store, StoreKeys::default())
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    pub fn backend_name(&self) -> &str {
        self.store.name()
    }

    pub fn supports_conditional_write(&self) -> bool {
        self.store.supports_conditional_write()
    }

    /// Current state, or the empty version-1 state on any failure.
    pub async fn read_state(&self) -> LotteryState {
        match self.fetch::<LotteryState>(&self.keys.state).await {
            Ok(Some(state)) => {
                debug!(
                    drawn = state.drawn_count(),
                    version = state.version,
                    "State loaded"
                );
                state
            }
            Ok(None) => {
                debug!(key = %self.keys.state, "No state document, using initial state");
                LotteryState::initial()
            }
            Err(e) => {
                warn!(key = %self.keys.state, error = %e, "State read failed, using initial state");
                LotteryState::initial()
            }
        }
    }

    /// Current configuration, or the defaults on any failure.
    pub async fn read_config(&self) -> LotteryConfig {
        match self.fetch::<LotteryConfig>(&self.keys.config).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!(key = %self.keys.config, "No config document, using defaults");
                LotteryConfig::default()
            }
            Err(e) => {
                warn!(key = %self.keys.config, error = %e, "Config read failed, using defaults");
                LotteryConfig::default()
            }
        }
    }

    /// Overwrite the state document.
    pub async fn write_state(&self, state: &LotteryState) -> bool {
        self.persist(&self.keys.state, state).await
    }

    /// Overwrite the configuration document.
    pub async fn write_config(&self, config: &LotteryConfig) -> bool {
        self.persist(&self.keys.config, config).await
    }

    /// Version of the persisted state. Unlike `read_state` this does not fail
    /// open: a commit must never be checked against a made-up version.
    pub async fn read_version(&self) -> Result<u64, StoreError> {
        let document = self.store.get(&self.keys.state).await?;
        Ok(LotteryState::version_of(document.as_ref()))
    }

    /// Conditional write of the state document, for backends that support it.
    pub async fn write_state_if_version(
        &self,
        expected_version: u64,
        state: &LotteryState,
    ) -> Result<CasOutcome, StoreError> {
        let document =
            serde_json::to_value(state).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store
            .compare_and_put(&self.keys.state, expected_version, &document)
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(document) = self.store.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_value(document)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn persist<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let document = match serde_json::to_value(value) {
            Ok(document) => document,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode document");
                return false;
            }
        };

        match self.store.put(key, &document).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, backend = self.store.name(), error = %e, "Document write failed");
                false
            }
        }
    }
}
