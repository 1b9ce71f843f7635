//! Route table.
//!
//! The same endpoints are mounted twice: under `/api` and under
//! `/.netlify/functions`, where the existing browser client looks for them.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use cd_01_state_store::StateStoreClient;
use cd_02_draw_engine::{ConfigManager, DrawEngine, ResetOperation};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::domain::config::{GatewayConfig, TimeoutConfig};
use crate::handlers;
use crate::middleware::{create_cors_layer, LotteryMetrics, TimeoutLayer, TracingLayer};

/// Prefix used by the browser client.
pub const FUNCTIONS_PREFIX: &str = "/.netlify/functions";

/// Prefix for direct API consumers.
pub const API_PREFIX: &str = "/api";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DrawEngine>,
    pub config: ConfigManager,
    pub reset: ResetOperation,
    pub store: StateStoreClient,
    pub metrics: Arc<LotteryMetrics>,
}

impl AppState {
    pub fn new(
        store: StateStoreClient,
        engine: DrawEngine,
        reset: ResetOperation,
        metrics: Arc<LotteryMetrics>,
    ) -> Self {
        Self {
            config: ConfigManager::new(store.clone()),
            engine: Arc::new(engine),
            reset,
            store,
            metrics,
        }
    }
}

/// Lottery endpoints, relative to a prefix.
///
/// `draw` is not under the request timeout: dropping it mid-commit could
/// persist a number the client never hears about. Its duration is bounded by
/// the engine's retry budget instead.
fn lottery_routes(timeouts: &TimeoutConfig) -> Router<AppState> {
    let timed = Router::new()
        .route(
            "/state",
            get(handlers::get_state).fallback(handlers::method_not_allowed),
        )
        .route(
            "/reset",
            post(handlers::reset).fallback(handlers::method_not_allowed),
        )
        .route(
            "/config",
            get(handlers::get_config)
                .post(handlers::update_config)
                .fallback(handlers::method_not_allowed),
        )
        .layer(TimeoutLayer::new(timeouts));

    Router::new()
        .route(
            "/draw",
            post(handlers::draw).fallback(handlers::method_not_allowed),
        )
        .merge(timed)
}

/// Build the HTTP router with its middleware stack
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new());

    let service_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TimeoutLayer::new(&config.timeouts));

    Router::new()
        .merge(service_routes)
        .nest(API_PREFIX, lottery_routes(&config.timeouts))
        .nest(FUNCTIONS_PREFIX, lottery_routes(&config.timeouts))
        .fallback(handlers::not_found)
        .layer(RequestBodyLimitLayer::new(config.limits.max_request_size))
        .layer(middleware)
        .with_state(state)
}
