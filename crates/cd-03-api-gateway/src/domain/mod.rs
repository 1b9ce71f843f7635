//! Domain types for the API Gateway: configuration, error envelope and the
//! JSON bodies exchanged with the browser client.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, CorsConfig, GatewayConfig, LimitsConfig, TimeoutConfig};
pub use error::{ApiError, ApiResult, GatewayError};
pub use types::*;
