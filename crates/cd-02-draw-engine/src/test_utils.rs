//! Store doubles for exercising the commit path.
//!
//! `ContendedStore` wraps an in-memory store and can simulate two things the
//! engine must survive: rival commits landing between our read and our
//! commit, and a store that stops accepting writes.
//!
//! State reads are numbered from 1. A draw performs, in order: one read for
//! the effective config, then per attempt one `read_state` and (plain stores
//! only) one `read_version`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use cd_01_state_store::{CasOutcome, DocumentStore, MemoryDocumentStore, StoreError, StoreKeys};
use parking_lot::Mutex;
use serde_json::Value;
use shared_types::LotteryState;

pub struct ContendedStore {
    inner: MemoryDocumentStore,
    state_key: String,
    state_reads: AtomicU32,
    rival_after: Mutex<HashSet<u32>>,
    rival_always: AtomicBool,
    failing_writes: AtomicU32,
    writes: AtomicU32,
}

impl ContendedStore {
    /// `conditional` selects between a CAS-capable and a plain store.
    pub fn new(conditional: bool) -> Self {
        let inner = if conditional {
            MemoryDocumentStore::new()
        } else {
            MemoryDocumentStore::without_conditional_writes()
        };
        Self {
            inner,
            state_key: StoreKeys::default().state,
            state_reads: AtomicU32::new(0),
            rival_after: Mutex::new(HashSet::new()),
            rival_always: AtomicBool::new(false),
            failing_writes: AtomicU32::new(0),
            writes: AtomicU32::new(0),
        }
    }

    /// A rival commit lands right after state read number `read`.
    pub fn rival_after_read(&self, read: u32) {
        self.rival_after.lock().insert(read);
    }

    /// A rival commit lands after every state read.
    pub fn rival_after_every_read(&self) {
        self.rival_always.store(true, Ordering::SeqCst);
    }

    /// The next `count` writes fail with a 503.
    pub fn fail_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Successful writes (plain or conditional) so far.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn state_reads(&self) -> u32 {
        self.state_reads.load(Ordering::SeqCst)
    }

    /// Persisted state, decoded.
    pub async fn state(&self) -> LotteryState {
        match self.inner.get(&self.state_key).await {
            Ok(Some(doc)) => serde_json::from_value(doc).unwrap_or_default(),
            _ => LotteryState::initial(),
        }
    }

    fn take_write_failure(&self) -> bool {
        self.failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn rejected(&self, key: &str) -> StoreError {
        StoreError::Status {
            backend: self.name().to_string(),
            key: key.to_string(),
            status: 503,
        }
    }

    /// A commit by someone else: only the version moves.
    async fn rival_commit(&self) {
        let mut state = self.state().await;
        state.version += 1;
        if let Ok(doc) = serde_json::to_value(&state) {
            let _ = self.inner.put(&self.state_key, &doc).await;
        }
    }
}

#[async_trait]
impl DocumentStore for ContendedStore {
    fn name(&self) -> &str {
        "contended"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let document = self.inner.get(key).await?;

        if key == self.state_key {
            let read = self.state_reads.fetch_add(1, Ordering::SeqCst) + 1;
            let rival =
                self.rival_always.load(Ordering::SeqCst) || self.rival_after.lock().remove(&read);
            if rival {
                self.rival_commit().await;
            }
        }

        Ok(document)
    }

    async fn put(&self, key: &str, document: &Value) -> Result<(), StoreError> {
        if self.take_write_failure() {
            return Err(self.rejected(key));
        }
        self.inner.put(key, document).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn supports_conditional_write(&self) -> bool {
        self.inner.supports_conditional_write()
    }

    async fn compare_and_put(
        &self,
        key: &str,
        expected_version: u64,
        document: &Value,
    ) -> Result<CasOutcome, StoreError> {
        if self.take_write_failure() {
            return Err(self.rejected(key));
        }
        let outcome = self
            .inner
            .compare_and_put(key, expected_version, document)
            .await?;
        if outcome.is_committed() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(outcome)
    }
}
