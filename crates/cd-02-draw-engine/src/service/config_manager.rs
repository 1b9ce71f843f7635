//! Configuration Manager.
//!
//! The persisted `isLocked` flag is only half of the lock: the effective lock
//! is also on as soon as anyone has drawn, whatever the config document says.

use std::sync::Arc;

use cd_01_state_store::StateStoreClient;
use shared_types::{LotteryConfig, MAX_TOTAL_NUMBERS, MIN_TOTAL_NUMBERS};
use tracing::{info, warn};

use crate::domain::DrawError;
use crate::ports::{Clock, SystemClock};

/// Reads and updates the lottery configuration.
#[derive(Clone)]
pub struct ConfigManager {
    store: StateStoreClient,
    clock: Arc<dyn Clock>,
}

impl ConfigManager {
    pub fn new(store: StateStoreClient) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: StateStoreClient, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persisted configuration with the lock derived from the state.
    pub async fn get_effective_config(&self) -> LotteryConfig {
        let (mut config, state) = tokio::join!(self.store.read_config(), self.store.read_state());
        config.is_locked = config.is_locked || state.has_started();
        config
    }

    /// Change the pool size. Refused once drawing has started.
    ///
    /// The lock check and the write are not atomic: two updates racing before
    /// the first draw may both pass.
    pub async fn update_config(&self, total_numbers: i64) -> Result<LotteryConfig, DrawError> {
        if !LotteryConfig::is_valid_total(total_numbers) {
            return Err(DrawError::Validation(format!(
                "Total numbers must be between {} and {}",
                MIN_TOTAL_NUMBERS, MAX_TOTAL_NUMBERS
            )));
        }

        if self.get_effective_config().await.is_locked {
            warn!(total_numbers, "Config update refused, lottery already started");
            return Err(DrawError::Locked);
        }

        let config = LotteryConfig {
            total_numbers: total_numbers as u32,
            is_locked: false,
            last_update: Some(self.clock.now()),
        };

        if !self.store.write_config(&config).await {
            return Err(DrawError::StoreUnavailable(
                "configuration write rejected".to_string(),
            ));
        }

        info!(total_numbers = config.total_numbers, "Configuration updated");
        Ok(config)
    }
}
