//! # cd-03-api-gateway
//!
//! HTTP surface of ClassDraw, consumed by the browser client.
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `draw` | Draw a number for `classIdentifier` |
//! | GET | `state` | Drawn numbers, participants, effective config |
//! | POST | `reset` | Start a new epoch (password) |
//! | GET / POST | `config` | Read / change `totalNumbers` before the first draw |
//! | GET | `/health` | Liveness and store backend |
//! | GET | `/metrics` | Request and draw counters |
//!
//! Lottery endpoints live under both `/api` and `/.netlify/functions`.
//!
//! Failures answer `{"success": false, "message": ..., "code": ...}` with
//! 400 for validation, full pool or locked config, 401 for a bad reset
//! password, 405 for a wrong method, 500 when the store fails and 503 when
//! retries are exhausted under contention.
//!
//! # Usage
//!
//! ```ignore
//! use cd_03_api_gateway::{ApiGatewayService, AppState, GatewayConfig};
//!
//! let service = ApiGatewayService::new(GatewayConfig::default(), state)?;
//! service.serve(shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

// Re-exports for public API
pub use domain::config::GatewayConfig;
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use middleware::LotteryMetrics;
pub use router::{build_router, AppState, API_PREFIX, FUNCTIONS_PREFIX};
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
