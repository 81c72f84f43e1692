use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::models::{Identity, RequestDescriptor, SupportedLocale};
use crate::services::cookie_writer::write_response_cookies;
use crate::utils::{ApiError, LocalizedError};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Identity,
    pub locale: SupportedLocale,
}

/// Current session, for client-side code that cannot read the session cookies.
///
/// Rotated provider cookies are forwarded on success and on 401 alike.
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, LocalizedError> {
    let req = RequestDescriptor::from_parts(&uri, &headers);
    let locale = state.gate.resolve_locale(&req);

    let Some(provider) = state.gate.provider() else {
        return Err(ApiError::IdentityProviderDisabled.localized(locale.as_str()));
    };

    let lookup = provider
        .get_session(req.cookies())
        .await
        .map_err(|e| ApiError::from(e).localized(locale.as_str()))?;

    let mut response = match lookup.session.identity() {
        Some(identity) => {
            tracing::debug!("Session lookup for user {}", identity.id);
            Json(SessionResponse { user: identity.clone(), locale: locale.clone() }).into_response()
        },
        None => ApiError::unauthorized("no session").localized(locale.as_str()).into_response(),
    };

    write_response_cookies(response.headers_mut(), None, &lookup.cookies_to_forward);
    Ok(response)
}
