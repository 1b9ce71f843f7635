//! # Runtime Configuration
//!
//! Everything the binary needs to assemble the service, with defaults that
//! run out of the box against an in-memory store.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CD_HTTP_PORT` | `gateway.http.port` |
//! | `CD_REQUEST_TIMEOUT_SECS` | `gateway.timeouts.request_secs` |
//! | `CD_STORE_BACKEND` | `store.backend` (`memory`, `http`, `composite`) |
//! | `CD_STORE_URL` | `store.http.base_url` |
//! | `CD_STORE_AUTH` | `store.http.auth_token` |
//! | `CD_STORE_ETAG` | `store.http.conditional_writes` |
//! | `CD_STATE_KEY` / `CD_CONFIG_KEY` | `store.keys` |
//! | `CD_RESET_PASSWORD` | `lottery.reset_password` |
//! | `CD_MAX_ATTEMPTS` | `lottery.retry.max_attempts` |
//! | `CD_RETRY_BASE_MS` / `CD_RETRY_JITTER_MS` | `lottery.retry` delays |

use std::fmt;
use std::str::FromStr;

use cd_01_state_store::{HttpStoreConfig, StoreKeys};
use cd_02_draw_engine::RetryPolicy;
use cd_03_api_gateway::GatewayConfig;
use thiserror::Error;
use tracing::{info, warn};

/// Reset password used when none is configured.
pub const DEFAULT_RESET_PASSWORD: &str = "12345678";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// HTTP surface.
    pub gateway: GatewayConfig,
    /// Document store selection and addressing.
    pub store: StoreSettings,
    /// Draw and reset behaviour.
    pub lottery: LotterySettings,
}

impl NodeConfig {
    /// Defaults overridden by `CD_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `CD_*` name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = parse_var(&lookup, "CD_HTTP_PORT")? {
            config.gateway.http.port = port;
        }
        if let Some(secs) = parse_var(&lookup, "CD_REQUEST_TIMEOUT_SECS")? {
            config.gateway.timeouts.request_secs = secs;
        }

        if let Some(backend) = parse_var(&lookup, "CD_STORE_BACKEND")? {
            config.store.backend = backend;
        }
        if let Some(url) = lookup("CD_STORE_URL") {
            config.store.http.base_url = url;
        }
        if let Some(token) = lookup("CD_STORE_AUTH").filter(|t| !t.is_empty()) {
            config.store.http.auth_token = Some(token);
        }
        if let Some(etag) = parse_var(&lookup, "CD_STORE_ETAG")? {
            config.store.http.conditional_writes = etag;
        }
        if let Some(key) = lookup("CD_STATE_KEY") {
            config.store.keys.state = key;
        }
        if let Some(key) = lookup("CD_CONFIG_KEY") {
            config.store.keys.config = key;
        }

        if let Some(password) = lookup("CD_RESET_PASSWORD") {
            info!("Loaded reset password from environment");
            config.lottery.reset_password = password;
        }
        if let Some(attempts) = parse_var(&lookup, "CD_MAX_ATTEMPTS")? {
            config.lottery.retry.max_attempts = attempts;
        }
        if let Some(ms) = parse_var(&lookup, "CD_RETRY_BASE_MS")? {
            config.lottery.retry.base_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "CD_RETRY_JITTER_MS")? {
            config.lottery.retry.jitter_ms = ms;
        }

        config.validate()?;
        Ok(config)
    }

    /// Structural checks that make the configuration unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Gateway(e.to_string()))?;

        if self.lottery.reset_password.is_empty() {
            return Err(ConfigError::EmptyResetPassword);
        }
        if self.lottery.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: "CD_MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        if self.store.backend != StoreBackend::Memory && self.store.http.base_url.is_empty() {
            return Err(ConfigError::MissingStoreUrl(self.store.backend));
        }
        if self.store.keys.state == self.store.keys.config {
            return Err(ConfigError::KeyCollision(self.store.keys.state.clone()));
        }
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the reset password is the built-in default
    /// - state is kept only in process memory
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.lottery.reset_password == DEFAULT_RESET_PASSWORD {
            return Err(ConfigError::InsecureResetPassword);
        }
        if self.store.backend == StoreBackend::Memory {
            return Err(ConfigError::VolatileStore);
        }
        Ok(())
    }
}

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Process memory; state is lost on restart.
    #[default]
    Memory,
    /// Remote REST JSON store.
    Http,
    /// Remote store first, process memory as fallback.
    Composite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "http" => Ok(Self::Http),
            "composite" => Ok(Self::Composite),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Http => "http",
            Self::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// Store configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Used by the `http` and `composite` backends.
    pub http: HttpStoreConfig,
    pub keys: StoreKeys,
}

/// Draw engine and reset configuration.
#[derive(Debug, Clone)]
pub struct LotterySettings {
    /// Shared secret required by the reset endpoint.
    pub reset_password: String,
    /// Optimistic commit retry schedule.
    pub retry: RetryPolicy,
}

impl Default for LotterySettings {
    fn default() -> Self {
        Self {
            reset_password: DEFAULT_RESET_PASSWORD.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("gateway configuration: {0}")]
    Gateway(String),

    #[error("reset password must not be empty")]
    EmptyResetPassword,

    #[error("store backend '{0}' requires CD_STORE_URL")]
    MissingStoreUrl(StoreBackend),

    #[error("state and config documents share the key '{0}'")]
    KeyCollision(String),

    #[error(
        "SECURITY: reset password is the built-in default. \
         Set CD_RESET_PASSWORD before exposing the service."
    )]
    InsecureResetPassword,

    #[error("memory store selected: lottery state will not survive a restart")]
    VolatileStore,
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };

    match raw.trim().parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            warn!(name, value = %raw, "Rejecting environment override");
            Err(ConfigError::InvalidValue { name, value: raw })
        }
    }
}
