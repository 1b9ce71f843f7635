//! # Concurrent Draw Tests
//!
//! Several engines sharing one document store stand in for several service
//! instances serving the same classroom. Whatever the interleaving, no number
//! may be issued twice and every committed document must be consistent.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use cd_01_state_store::{DocumentStore, MemoryDocumentStore, StateStoreClient};
    use cd_02_draw_engine::test_utils::ContendedStore;
    use cd_02_draw_engine::{DrawEngine, DrawError, RetryPolicy};
    use shared_types::{LotteryConfig, DEFAULT_TOTAL_NUMBERS};

    const INSTANCES: u64 = 4;

    fn engines(store: Arc<dyn DocumentStore>, max_attempts: u32) -> Vec<Arc<DrawEngine>> {
        (0..INSTANCES)
            .map(|seed| {
                let client = StateStoreClient::with_default_keys(Arc::clone(&store));
                Arc::new(
                    DrawEngine::new(client, RetryPolicy::immediate(max_attempts)).with_seed(seed),
                )
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_instances_exhaust_pool_without_duplicates() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let total = DEFAULT_TOTAL_NUMBERS;
        // A draw loses at most once per rival commit.
        let engines = engines(Arc::clone(&store), total);

        let handles: Vec<_> = (0..total)
            .map(|i| {
                let engine = Arc::clone(&engines[i as usize % engines.len()]);
                tokio::spawn(async move { engine.draw(&format!("class-{}", i)).await })
            })
            .collect();

        let mut numbers = HashSet::new();
        for handle in handles {
            let receipt = handle.await.unwrap().unwrap();
            assert!(receipt.number >= 1 && receipt.number <= total);
            assert!(numbers.insert(receipt.number), "duplicate {}", receipt.number);
        }
        assert_eq!(numbers.len(), total as usize);

        let client = StateStoreClient::with_default_keys(Arc::clone(&store));
        let state = client.read_state().await;
        assert_eq!(state.version, 1 + u64::from(total));
        assert_eq!(state.participants.len(), total as usize);
        state.check_invariants(total).unwrap();

        let result = engines[0].draw("latecomer").await;
        assert!(matches!(result, Err(DrawError::LotteryFull { total: t }) if t == total));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_observe_inconsistent_state() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let client = StateStoreClient::with_default_keys(Arc::clone(&store));
        assert!(client.write_config(&LotteryConfig::unlocked(16)).await);
        let engines = engines(Arc::clone(&store), 16);

        let writers: Vec<_> = (0..16u32)
            .map(|i| {
                let engine = Arc::clone(&engines[i as usize % engines.len()]);
                tokio::spawn(async move { engine.draw(&format!("w{}", i)).await })
            })
            .collect();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move {
                    let mut last_version = 0;
                    for _ in 0..20 {
                        let state = client.read_state().await;
                        state.check_invariants(16).unwrap();
                        assert_eq!(state.version, 1 + state.drawn_count() as u64);
                        assert!(state.version >= last_version);
                        last_version = state.version;
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.await.unwrap().unwrap();
        }
        for reader in readers {
            reader.await.unwrap();
        }

        assert_eq!(client.read_state().await.drawn_count(), 16);
    }

    #[tokio::test]
    async fn test_plain_store_retry_survives_interleaved_rival() {
        let contended = Arc::new(ContendedStore::new(false));
        // Read 1 serves the effective config, read 2 is the first attempt.
        contended.rival_after_read(2);

        let client = StateStoreClient::with_default_keys(contended.clone());
        let engine = DrawEngine::new(client, RetryPolicy::immediate(3)).with_seed(11);

        let receipt = engine.draw("4C").await.unwrap();
        assert_eq!(receipt.attempts, 2);
        assert_eq!(contended.writes(), 1);

        let state = contended.state().await;
        // Rival bumped 1 -> 2, our commit 2 -> 3.
        assert_eq!(state.version, 3);
        assert_eq!(state.drawn_numbers, vec![receipt.number]);
    }

    #[tokio::test]
    async fn test_sustained_contention_gives_up_without_writing() {
        let contended = Arc::new(ContendedStore::new(true));
        contended.rival_after_every_read();

        let client = StateStoreClient::with_default_keys(contended.clone());
        let engine = DrawEngine::new(client, RetryPolicy::immediate(4)).with_seed(3);

        let result = engine.draw("5A").await;
        assert!(matches!(
            result,
            Err(DrawError::MaxRetriesExceeded { attempts: 4 })
        ));
        assert_eq!(contended.writes(), 0);
        assert!(contended.state().await.drawn_numbers.is_empty());
    }
}
