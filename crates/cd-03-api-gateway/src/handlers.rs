//! HTTP handlers.
//!
//! Bodies are read as raw bytes and decoded here so that an empty body means
//! "no fields" and a malformed one yields the usual JSON error envelope.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::Uri,
    Json,
};
use cd_02_draw_engine::DrawError;
use serde::de::DeserializeOwned;
use shared_types::{MAX_TOTAL_NUMBERS, MIN_TOTAL_NUMBERS};
use tracing::{info, warn};

use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{
    ConfigResponse, ConfigUpdateRequest, ConfigUpdateResponse, DrawRequest, DrawResponse,
    HealthResponse, MessageResponse, ResetRequest, StateResponse, StateView,
};
use crate::middleware::RequestTimer;
use crate::router::AppState;

fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("Invalid JSON body: {}", e)))
}

fn finish<T>(timer: RequestTimer, result: ApiResult<T>) -> ApiResult<T> {
    timer.finish(result.is_ok());
    result
}

/// `POST draw`
pub async fn draw(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<DrawResponse>> {
    let timer = RequestTimer::new(state.metrics.clone());
    finish(timer, run_draw(&state, &body).await)
}

async fn run_draw(state: &AppState, body: &Bytes) -> ApiResult<Json<DrawResponse>> {
    let request: DrawRequest = parse_body(body)?;
    let class_identifier = request.class_identifier.unwrap_or_default();

    // The draw runs as its own task so a client that hangs up cannot cancel
    // it between the commit and the reply.
    let engine = Arc::clone(&state.engine);
    let identifier = class_identifier.clone();
    let outcome = tokio::spawn(async move { engine.draw(&identifier).await })
        .await
        .unwrap_or_else(|e| Err(DrawError::Internal(e.to_string())));
    state.metrics.record_draw(&outcome);

    let receipt = outcome.map_err(|e| {
        warn!(class = %class_identifier.trim(), code = e.code(), error = %e, "Draw rejected");
        ApiError::from(e)
    })?;
    Ok(Json(DrawResponse::from(receipt)))
}

/// `GET state`
pub async fn get_state(State(state): State<AppState>) -> ApiResult<Json<StateResponse>> {
    let timer = RequestTimer::new(state.metrics.clone());

    let (lottery, config) = tokio::join!(
        state.store.read_state(),
        state.config.get_effective_config()
    );
    let response = StateResponse {
        success: true,
        state: StateView::new(lottery, config.total_numbers),
        config,
    };

    finish(timer, Ok(Json(response)))
}

/// `POST reset`
pub async fn reset(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<MessageResponse>> {
    let timer = RequestTimer::new(state.metrics.clone());
    finish(timer, run_reset(&state, &body).await)
}

async fn run_reset(state: &AppState, body: &Bytes) -> ApiResult<Json<MessageResponse>> {
    let request: ResetRequest = parse_body(body)?;
    state.reset.reset(&request.password).await?;
    state.metrics.record_reset();

    Ok(Json(MessageResponse {
        success: true,
        message: "Lottery has been reset".to_string(),
    }))
}

/// `GET config`
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<ConfigResponse>> {
    let timer = RequestTimer::new(state.metrics.clone());
    let config = state.config.get_effective_config().await;

    finish(
        timer,
        Ok(Json(ConfigResponse {
            success: true,
            config,
        })),
    )
}

/// `POST config`
pub async fn update_config(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ConfigUpdateResponse>> {
    let timer = RequestTimer::new(state.metrics.clone());
    finish(timer, run_update_config(&state, &body).await)
}

async fn run_update_config(
    state: &AppState,
    body: &Bytes,
) -> ApiResult<Json<ConfigUpdateResponse>> {
    let request: ConfigUpdateRequest = parse_body(body)?;
    let total = request.requested_total().ok_or_else(|| {
        ApiError::validation(format!(
            "Total numbers must be between {} and {}",
            MIN_TOTAL_NUMBERS, MAX_TOTAL_NUMBERS
        ))
    })?;

    let config = state.config.update_config(total).await?;
    state.metrics.record_config_update();
    info!(total_numbers = config.total_numbers, "Pool size changed");

    Ok(Json(ConfigUpdateResponse {
        success: true,
        message: format!("Total numbers set to {}", config.total_numbers),
        config,
    }))
}

/// Any method a route does not serve
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Any path no route serves
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "classdraw",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend_name().to_string(),
    })
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.metrics.to_json())
}
