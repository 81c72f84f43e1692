use axum::{Router, middleware::from_fn_with_state, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

rust_i18n::i18n!("locales", fallback = "en");

use crate::services::LocaleGate;

pub struct AppState {
    pub gate: Arc<LocaleGate>,
}

impl AppState {
    pub fn new(gate: LocaleGate) -> Self {
        Self { gate: Arc::new(gate) }
    }
}

/// Routes hosted next to the gate, with the gate in front of all of them.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/session", get(handlers::session::current_session))
        .route("/auth/callback", get(handlers::auth::auth_callback))
        .fallback(handlers::pages::page_fallback)
        .layer(from_fn_with_state(Arc::clone(&state.gate), middleware::locale_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
