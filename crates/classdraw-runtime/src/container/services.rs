//! # Service Container
//!
//! Builds the service graph from a [`NodeConfig`].
//!
//! ```text
//! DocumentStore (memory | http | composite)
//!        │
//!        ↓
//! StateStoreClient ──┬──→ DrawEngine
//!                    ├──→ ResetOperation
//!                    └──→ ConfigManager (inside AppState)
//!                                  │
//!                                  ↓
//!                         ApiGatewayService
//! ```

use std::sync::Arc;

use cd_01_state_store::{
    CompositeDocumentStore, DocumentStore, HttpDocumentStore, MemoryDocumentStore,
    StateStoreClient, StoreError,
};
use cd_02_draw_engine::{DrawEngine, ResetOperation};
use cd_03_api_gateway::{ApiGatewayService, AppState, GatewayError, LotteryMetrics};
use thiserror::Error;
use tracing::{info, instrument};

use crate::container::config::{NodeConfig, StoreBackend};

/// Failure while assembling services.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),

    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),
}

/// Central container holding the wired services.
pub struct ServiceContainer {
    pub config: NodeConfig,
    pub store: StateStoreClient,
    pub metrics: Arc<LotteryMetrics>,
    state: AppState,
}

impl ServiceContainer {
    #[instrument(skip_all, fields(backend = %config.store.backend))]
    pub fn new(config: NodeConfig) -> Result<Self, ContainerError> {
        let backend = build_document_store(&config)?;
        let store = StateStoreClient::new(backend, config.store.keys.clone());
        info!(
            backend = store.backend_name(),
            conditional = store.supports_conditional_write(),
            state_key = %store.keys().state,
            config_key = %store.keys().config,
            "Document store ready"
        );

        let engine = DrawEngine::new(store.clone(), config.lottery.retry);
        let reset = ResetOperation::new(store.clone(), config.lottery.reset_password.clone());
        let metrics = Arc::new(LotteryMetrics::new());
        let state = AppState::new(store.clone(), engine, reset, Arc::clone(&metrics));

        Ok(Self {
            config,
            store,
            metrics,
            state,
        })
    }

    /// Shared handler state.
    pub fn app_state(&self) -> AppState {
        self.state.clone()
    }

    /// HTTP service over the wired state.
    pub fn gateway(&self) -> Result<ApiGatewayService, ContainerError> {
        Ok(ApiGatewayService::new(
            self.config.gateway.clone(),
            self.app_state(),
        )?)
    }
}

fn build_document_store(config: &NodeConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        StoreBackend::Http => Arc::new(HttpDocumentStore::new(config.store.http.clone())?),
        StoreBackend::Composite => {
            let remote: Arc<dyn DocumentStore> =
                Arc::new(HttpDocumentStore::new(config.store.http.clone())?);
            let local: Arc<dyn DocumentStore> =
                Arc::new(MemoryDocumentStore::without_conditional_writes());
            Arc::new(CompositeDocumentStore::new(vec![remote, local]))
        }
    };
    Ok(store)
}
