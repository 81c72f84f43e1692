use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use crate::services::path_classifier::localized_path;
use crate::utils::sanitize_return_to;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

/// Landing point after sign-in: replay `returnTo` if it is a local path,
/// otherwise go to the default dashboard.
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let fallback = localized_path(state.gate.locales().default_locale(), "/dashboard");
    let target = sanitize_return_to(query.return_to.as_deref(), &fallback);
    tracing::debug!("Auth callback redirecting to {}", target);
    Redirect::temporary(&target)
}
