//! Gateway Health API
//!
//! Liveness text on `/` and a JSON status report on `/api/health`.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

pub const LIVENESS_TEXT: &str = "PillScan server is running!";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub catalog_records: usize,
    pub ocr_provider: String,
    pub ner_provider: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /`
pub async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let pipeline = &state.pipeline;
    Json(HealthReport {
        status: "ok",
        service: "pillscan",
        version: env!("CARGO_PKG_VERSION"),
        catalog_records: pipeline.catalog().len(),
        ocr_provider: pipeline.extractor_name().to_string(),
        ner_provider: pipeline.recognizer_name().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
