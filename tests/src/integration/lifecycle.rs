//! # Classroom Lifecycle Tests
//!
//! Drives a fully wired service (as assembled by the runtime) through a whole
//! session: configure the pool, draw until it is exhausted, reset, reconfigure.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use cd_01_state_store::{
        CompositeDocumentStore, DocumentStore, HttpDocumentStore, HttpStoreConfig,
        MemoryDocumentStore, StateStoreClient, StoreError,
    };
    use cd_02_draw_engine::{ConfigManager, DrawEngine, DrawError, RetryPolicy};
    use classdraw_runtime::{NodeConfig, ServiceContainer};
    use serde_json::{json, Value};
    use shared_types::{LotteryConfig, LotteryState};

    const SECRET: &str = "staff-room-key";

    fn container() -> ServiceContainer {
        let mut config = NodeConfig::default();
        config.lottery.reset_password = SECRET.to_string();
        config.lottery.retry = RetryPolicy::immediate(3);
        ServiceContainer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_full_session() {
        let container = container();
        let app = container.app_state();

        // Before anything is drawn the pool can be resized.
        let config = app.config.update_config(5).await.unwrap();
        assert_eq!(config.total_numbers, 5);
        assert!(!config.is_locked);

        let mut drawn = Vec::new();
        for class in ["1A", "1B", "2A", "2B", "3A"] {
            drawn.push(app.engine.draw(class).await.unwrap().number);
        }
        drawn.sort_unstable();
        assert_eq!(drawn, vec![1, 2, 3, 4, 5]);

        assert!(matches!(
            app.engine.draw("3B").await,
            Err(DrawError::LotteryFull { total: 5 })
        ));

        // Drawing has started, so the pool is frozen.
        assert!(app.config.get_effective_config().await.is_locked);
        assert!(matches!(
            app.config.update_config(30).await,
            Err(DrawError::Locked)
        ));

        assert!(matches!(
            app.reset.reset("guess").await,
            Err(DrawError::Auth)
        ));
        assert_eq!(container.store.read_state().await.drawn_count(), 5);

        app.reset.reset(SECRET).await.unwrap();
        let state = container.store.read_state().await;
        assert!(state.drawn_numbers.is_empty());
        assert!(state.participants.is_empty());
        assert_eq!(state.version, 1);

        let config = app.config.get_effective_config().await;
        assert_eq!(config.total_numbers, 5);
        assert!(!config.is_locked);

        app.config.update_config(30).await.unwrap();
        let receipt = app.engine.draw("1A").await.unwrap();
        assert_eq!(receipt.total_numbers, 30);
        assert_eq!(container.store.read_state().await.version, 2);
    }

    #[tokio::test]
    async fn test_rejected_draws_leave_no_trace() {
        let container = container();
        let app = container.app_state();
        app.config.update_config(1).await.unwrap();

        assert!(matches!(
            app.engine.draw("   ").await,
            Err(DrawError::Validation(_))
        ));
        assert!(!app.config.get_effective_config().await.is_locked);

        app.engine.draw("only").await.unwrap();
        let before = container.store.read_state().await;

        assert!(matches!(
            app.engine.draw("another").await,
            Err(DrawError::LotteryFull { total: 1 })
        ));
        assert_eq!(container.store.read_state().await, before);
    }

    #[tokio::test]
    async fn test_continues_documents_written_by_older_deployments() {
        let memory = Arc::new(MemoryDocumentStore::new());
        memory
            .put(
                "lottery-state",
                &json!({
                    "drawnNumbers": [4],
                    "participants": [
                        { "classNumber": "2B", "number": 4, "timestamp": "2024-03-01T08:00:00Z" }
                    ]
                }),
            )
            .await
            .unwrap();

        let client = StateStoreClient::with_default_keys(memory);
        let engine = DrawEngine::new(client.clone(), RetryPolicy::immediate(3)).with_seed(5);

        let receipt = engine.draw("3C").await.unwrap();
        assert_ne!(receipt.number, 4);

        let state = client.read_state().await;
        assert_eq!(state.version, 2);
        assert_eq!(state.participants[0].class_identifier, "2B");
        assert_eq!(state.participants[1].class_identifier, "3C");
        assert!(ConfigManager::new(client)
            .get_effective_config()
            .await
            .is_locked);
    }

    #[tokio::test]
    async fn test_composite_store_keeps_serving_when_remote_is_down() {
        let remote = HttpDocumentStore::new(HttpStoreConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 500,
            ..HttpStoreConfig::default()
        })
        .unwrap();
        let local = Arc::new(MemoryDocumentStore::without_conditional_writes());
        let members: Vec<Arc<dyn DocumentStore>> = vec![Arc::new(remote), local.clone()];
        let client = StateStoreClient::with_default_keys(Arc::new(CompositeDocumentStore::new(
            members,
        )));

        let engine = DrawEngine::new(client.clone(), RetryPolicy::immediate(3)).with_seed(9);
        let receipt = engine.draw("6A").await.unwrap();
        assert_eq!(receipt.attempts, 1);

        let raw = local.get("lottery-state").await.unwrap().unwrap();
        let state: LotteryState = serde_json::from_value(raw).unwrap();
        assert_eq!(state.drawn_numbers, vec![receipt.number]);
        assert_eq!(state.version, 2);
    }

    /// Remote backend that can drop off the network and come back.
    #[derive(Default)]
    struct IntermittentRemote {
        inner: MemoryDocumentStore,
        offline: AtomicBool,
    }

    impl IntermittentRemote {
        fn reachable(&self) -> Result<(), StoreError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Transport {
                    backend: "remote".to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for IntermittentRemote {
        fn name(&self) -> &str {
            "remote"
        }

        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.reachable()?;
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, document: &Value) -> Result<(), StoreError> {
            self.reachable()?;
            self.inner.put(key, document).await
        }
    }

    #[tokio::test]
    async fn test_remote_outage_and_recovery_never_reissues_a_number() {
        let remote = Arc::new(IntermittentRemote::default());
        let local = Arc::new(MemoryDocumentStore::without_conditional_writes());
        let members: Vec<Arc<dyn DocumentStore>> = vec![remote.clone(), local];
        let client = StateStoreClient::with_default_keys(Arc::new(CompositeDocumentStore::new(
            members,
        )));
        assert!(client.write_config(&LotteryConfig::unlocked(2)).await);

        let engine = DrawEngine::new(client.clone(), RetryPolicy::immediate(3)).with_seed(2);

        let a = engine.draw("A").await.unwrap().number;

        remote.offline.store(true, Ordering::SeqCst);
        let b = engine.draw("B").await.unwrap().number;
        remote.offline.store(false, Ordering::SeqCst);
        assert_ne!(a, b);

        assert!(matches!(
            engine.draw("C").await,
            Err(DrawError::LotteryFull { total: 2 })
        ));

        let state = client.read_state().await;
        let holders: Vec<(&str, u32)> = state
            .participants
            .iter()
            .map(|p| (p.class_identifier.as_str(), p.number))
            .collect();
        assert_eq!(holders, vec![("A", a), ("B", b)]);
        assert_eq!(state.version, 3);
    }
}
