//! Request and response bodies of the HTTP surface.
//!
//! Field names are camelCase to match the browser client.

use cd_02_draw_engine::DrawReceipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{DrawNumber, LotteryConfig, LotteryState, Participant};

/// `POST draw`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    /// Older clients send `classNumber`.
    #[serde(default, alias = "classNumber")]
    pub class_identifier: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    pub success: bool,
    pub number: DrawNumber,
    pub class_identifier: String,
    pub timestamp: DateTime<Utc>,
    pub attempts: u32,
    pub total_numbers: u32,
}

impl From<DrawReceipt> for DrawResponse {
    fn from(receipt: DrawReceipt) -> Self {
        Self {
            success: true,
            number: receipt.number,
            class_identifier: receipt.class_identifier,
            timestamp: receipt.timestamp,
            attempts: receipt.attempts,
            total_numbers: receipt.total_numbers,
        }
    }
}

/// State snapshot as shown to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub drawn_numbers: Vec<DrawNumber>,
    pub participants: Vec<Participant>,
    pub total_numbers: u32,
    pub version: u64,
    pub last_update: Option<DateTime<Utc>>,
}

impl StateView {
    pub fn new(state: LotteryState, total_numbers: u32) -> Self {
        Self {
            drawn_numbers: state.drawn_numbers,
            participants: state.participants,
            total_numbers,
            version: state.version,
            last_update: state.last_update,
        }
    }
}

/// `GET state`
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub success: bool,
    pub state: StateView,
    pub config: LotteryConfig,
}

/// `POST reset`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub password: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// `GET config`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub config: LotteryConfig,
}

/// `POST config`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdateRequest {
    /// Number or numeric string.
    #[serde(default)]
    pub total_numbers: Option<Value>,
}

impl ConfigUpdateRequest {
    /// Requested pool size, if the field holds an integer.
    pub fn requested_total(&self) -> Option<i64> {
        match self.total_numbers.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigUpdateResponse {
    pub success: bool,
    pub message: String,
    pub config: LotteryConfig,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub store: String,
}
