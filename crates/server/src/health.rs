use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::repo::TodoStore;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Health check handler. Always 200; a store failure shows up in `store`.
pub async fn health_check(State(todos): State<Arc<dyn TodoStore>>) -> Json<HealthResponse> {
    let store_status = match todos.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e.message),
    };

    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        store: store_status,
        uptime_seconds: uptime,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
