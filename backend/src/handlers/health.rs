use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub identity_provider: bool,
    pub locales: Vec<String>,
}

/// Liveness probe
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        identity_provider: state.gate.identity_enabled(),
        locales: state.gate.locales().iter().map(|l| l.to_string()).collect(),
    })
}
