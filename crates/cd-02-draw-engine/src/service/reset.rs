//! Reset Operation.

use std::sync::Arc;

use cd_01_state_store::StateStoreClient;
use shared_types::{LotteryConfig, LotteryState};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::domain::DrawError;
use crate::ports::{Clock, SystemClock};

/// Starts a new epoch: clears every draw, guarded by a shared secret.
#[derive(Clone)]
pub struct ResetOperation {
    store: StateStoreClient,
    secret: String,
    clock: Arc<dyn Clock>,
}

impl ResetOperation {
    pub fn new(store: StateStoreClient, secret: impl Into<String>) -> Self {
        Self::with_clock(store, secret, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: StateStoreClient,
        secret: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            secret: secret.into(),
            clock,
        }
    }

    /// Overwrite the state with an empty version-1 document.
    ///
    /// Reset always wins: there is no version check. The pool size survives,
    /// a persisted lock flag does not.
    pub async fn reset(&self, password: &str) -> Result<(), DrawError> {
        if !constant_time_compare(password, &self.secret) {
            warn!("Reset refused: incorrect password");
            return Err(DrawError::Auth);
        }

        let now = self.clock.now();
        let state = LotteryState::initial().with_last_update(now);
        if !self.store.write_state(&state).await {
            return Err(DrawError::StoreUnavailable(
                "state write rejected during reset".to_string(),
            ));
        }

        let config = self.store.read_config().await;
        if config.is_locked {
            let unlocked = LotteryConfig {
                is_locked: false,
                last_update: Some(now),
                ..config
            };
            if !self.store.write_config(&unlocked).await {
                warn!("Reset cleared the state but could not clear the config lock flag");
            }
        }

        info!(total_numbers = config.total_numbers, "Lottery reset");
        Ok(())
    }
}

/// Constant-time string comparison.
///
/// Runs over the longer of the two inputs so neither content nor length
/// leaks through timing.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let max_len = a.len().max(b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}
