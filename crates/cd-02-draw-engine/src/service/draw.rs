//! Draw Engine.
//!
//! ## Attempt Lifecycle
//!
//! ```text
//! START → READ → COMPUTE → COMMIT_ATTEMPT ─┬─→ SUCCESS
//!          ↑                               ├─→ CONFLICT_RETRY ──┐
//!          └───────────── backoff ─────────┘                    │
//!          └────────────────────────────────────────────────────┘
//!                                          └─→ TERMINAL_FAILURE
//! ```
//!
//! The commit is optimistic. Against a store with a conditional write the
//! version check and the write are one operation. Against a plain store the
//! version is re-read right before an unconditional write, which narrows the
//! lost-update window to the gap between those two requests.

use std::sync::Arc;

use cd_01_state_store::{CasOutcome, StateStoreClient};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{DrawNumber, LotteryState};
use tracing::{debug, info, warn};

use super::ConfigManager;
use crate::domain::{available_numbers, DrawError, RetryPolicy};
use crate::ports::{Clock, SystemClock};

/// A committed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawReceipt {
    pub number: DrawNumber,
    pub class_identifier: String,
    pub timestamp: DateTime<Utc>,
    /// Attempts used, the successful one included.
    pub attempts: u32,
    pub total_numbers: u32,
}

/// Outcome of one commit attempt.
enum Commit {
    Done,
    Conflict { found: Option<u64> },
    StoreFailed(String),
}

/// Why the last failed attempt failed.
enum LastFailure {
    Conflict,
    Store(String),
}

/// Issues unique numbers with bounded optimistic retry.
pub struct DrawEngine {
    store: StateStoreClient,
    config: ConfigManager,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl DrawEngine {
    pub fn new(store: StateStoreClient, policy: RetryPolicy) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            config: ConfigManager::with_clock(store.clone(), clock.clone()),
            store,
            policy,
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic number selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.config = ConfigManager::with_clock(self.store.clone(), clock.clone());
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Draw a number for `class_identifier`.
    pub async fn draw(&self, class_identifier: &str) -> Result<DrawReceipt, DrawError> {
        let class_identifier = class_identifier.trim();
        if class_identifier.is_empty() {
            return Err(DrawError::Validation(
                "Class identifier is required".to_string(),
            ));
        }

        let total = self.config.get_effective_config().await.total_numbers;
        let max_attempts = self.policy.attempts();
        let mut last_failure = LastFailure::Conflict;

        for attempt in 1..=max_attempts {
            let state = self.store.read_state().await;
            let expected = state.version;

            let number = self.pick(&state, total)?;
            let timestamp = self.clock.now();
            let candidate = state.with_draw(class_identifier, number, timestamp);

            match self.commit(expected, &candidate).await {
                Commit::Done => {
                    info!(
                        class = class_identifier,
                        number,
                        attempt,
                        version = candidate.version,
                        "Number drawn"
                    );
                    return Ok(DrawReceipt {
                        number,
                        class_identifier: class_identifier.to_string(),
                        timestamp,
                        attempts: attempt,
                        total_numbers: total,
                    });
                }
                Commit::Conflict { found } => {
                    debug!(attempt, expected, ?found, "Version conflict, retrying");
                    last_failure = LastFailure::Conflict;
                }
                Commit::StoreFailed(reason) => {
                    warn!(attempt, error = %reason, "Commit failed");
                    last_failure = LastFailure::Store(reason);
                }
            }

            if attempt < max_attempts {
                let delay = {
                    let mut rng = self.rng.lock();
                    self.policy.backoff(&mut *rng)
                };
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        match last_failure {
            LastFailure::Conflict => {
                warn!(class = class_identifier, attempts = max_attempts, "Draw gave up under contention");
                Err(DrawError::MaxRetriesExceeded {
                    attempts: max_attempts,
                })
            }
            LastFailure::Store(reason) => Err(DrawError::StoreUnavailable(reason)),
        }
    }

    /// COMPUTE: a uniformly random number from the remaining pool.
    fn pick(&self, state: &LotteryState, total: u32) -> Result<DrawNumber, DrawError> {
        if state.drawn_count() >= total as usize {
            return Err(DrawError::LotteryFull { total });
        }

        let available = available_numbers(total, &state.drawn_numbers);
        if available.is_empty() {
            return Err(DrawError::LotteryFull { total });
        }

        let index = self.rng.lock().gen_range(0..available.len());
        Ok(available[index])
    }

    /// COMMIT_ATTEMPT for a candidate built from version `expected`.
    async fn commit(&self, expected: u64, candidate: &LotteryState) -> Commit {
        if self.store.supports_conditional_write() {
            return match self.store.write_state_if_version(expected, candidate).await {
                Ok(CasOutcome::Committed) => Commit::Done,
                Ok(CasOutcome::Conflict { found }) => Commit::Conflict { found },
                Err(e) => Commit::StoreFailed(e.to_string()),
            };
        }

        match self.store.read_version().await {
            Ok(current) if current != expected => Commit::Conflict {
                found: Some(current),
            },
            Ok(_) => {
                if self.store.write_state(candidate).await {
                    Commit::Done
                } else {
                    Commit::StoreFailed("state write rejected".to_string())
                }
            }
            Err(e) => Commit::StoreFailed(e.to_string()),
        }
    }
}
