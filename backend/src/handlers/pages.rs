use axum::{Extension, Json, http::Uri};
use serde::Serialize;

use crate::models::{Identity, SupportedLocale};
use crate::utils::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct PageAck {
    pub path: String,
    pub locale: SupportedLocale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Stand-in for page rendering: acknowledges a request that passed the gate.
///
/// Requests the gate excluded carry no locale and end here only when no
/// route matched them.
pub async fn page_fallback(
    uri: Uri,
    locale: Option<Extension<SupportedLocale>>,
    identity: Option<Extension<Identity>>,
) -> ApiResult<Json<PageAck>> {
    let Some(Extension(locale)) = locale else {
        return Err(ApiError::not_found(uri.path().to_string()));
    };

    Ok(Json(PageAck {
        path: uri.path().to_string(),
        locale,
        user_id: identity.map(|Extension(identity)| identity.id),
    }))
}
