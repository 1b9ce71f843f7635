//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → CORS → Tracing → BodyLimit → Timeout → Handler
//!
//! The timeout wraps every route except `draw`.

pub mod cors;
pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::{LotteryMetrics, RequestTimer};
pub use timeout::TimeoutLayer;
pub use tracing::TracingLayer;
