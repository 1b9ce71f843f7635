use serde::{Deserialize, Serialize};

/// Document keys used in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    /// Key of the lottery state document.
    pub state: String,
    /// Key of the configuration document.
    pub config: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            state: "lottery-state".to_string(),
            config: "lottery-config".to_string(),
        }
    }
}
