//! Lottery counters exposed on `/metrics`.

use cd_02_draw_engine::{DrawError, DrawReceipt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Gateway and draw counters
#[derive(Default)]
pub struct LotteryMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Draw outcomes
    pub draws_total: AtomicU64,
    pub draws_success: AtomicU64,
    pub draws_rejected: AtomicU64,
    pub draws_contention_exhausted: AtomicU64,
    pub draws_store_failed: AtomicU64,
    /// Extra attempts spent by successful draws
    pub draw_retries: AtomicU64,

    // Administrative operations
    pub resets: AtomicU64,
    pub config_updates: AtomicU64,

    // Latency tracking
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl LotteryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, success: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a draw
    pub fn record_draw(&self, outcome: &Result<DrawReceipt, DrawError>) {
        self.draws_total.fetch_add(1, Ordering::Relaxed);

        match outcome {
            Ok(receipt) => {
                self.draws_success.fetch_add(1, Ordering::Relaxed);
                self.draw_retries.fetch_add(
                    u64::from(receipt.attempts.saturating_sub(1)),
                    Ordering::Relaxed,
                );
            }
            Err(e) if e.is_rejection() => {
                self.draws_rejected.fetch_add(1, Ordering::Relaxed);
            }
            Err(DrawError::MaxRetriesExceeded { .. }) => {
                self.draws_contention_exhausted
                    .fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.draws_store_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_config_update(&self) {
        self.config_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
            },
            "draws": {
                "total": self.draws_total.load(Ordering::Relaxed),
                "success": self.draws_success.load(Ordering::Relaxed),
                "rejected": self.draws_rejected.load(Ordering::Relaxed),
                "contention_exhausted": self.draws_contention_exhausted.load(Ordering::Relaxed),
                "store_failed": self.draws_store_failed.load(Ordering::Relaxed),
                "retries": self.draw_retries.load(Ordering::Relaxed),
            },
            "admin": {
                "resets": self.resets.load(Ordering::Relaxed),
                "config_updates": self.config_updates.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<LotteryMetrics>,
}

impl RequestTimer {
    pub fn new(metrics: Arc<LotteryMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self, success: bool) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request(success, latency_ms);
    }
}
