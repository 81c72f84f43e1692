use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_i18n::t;
use serde::Serialize;
use thiserror::Error;

use super::i18n::DEFAULT_LOCALE;

/// Failures talking to the identity provider.
///
/// A rejected token is not an error; it resolves to an absent session. These
/// variants cover the cases where the provider could not answer at all.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Identity provider returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Identity provider is misconfigured: {0}")]
    Misconfigured(String),
}

impl SessionError {
    pub fn unexpected_status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status: status.as_u16(), body: body.into() }
    }
}

/// Errors returned by the JSON endpoints hosted next to the gate.
#[derive(Error, Debug)]
pub enum ApiError {
    // Authentication errors 1xxx
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Identity provider not configured")]
    IdentityProviderDisabled,

    // Resource errors 3xxx
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    // Upstream errors 5xxx
    #[error("Identity provider unavailable: {0}")]
    IdentityProviderUnavailable(#[from] SessionError),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound(message.into())
    }

    pub fn error_code(&self) -> i32 {
        match self {
            Self::Unauthorized(_) => 1001,
            Self::IdentityProviderDisabled => 1002,
            Self::ResourceNotFound(_) => 3000,
            Self::IdentityProviderUnavailable(_) => 5003,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error_code() {
            1001..=1999 => StatusCode::UNAUTHORIZED,
            3000..=3999 => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message translated into `locale`; unknown locales use the fallback.
    pub fn localized_message(&self, locale: &str) -> String {
        match self {
            Self::Unauthorized(_) => t!("auth.no_session", locale = locale).to_string(),
            Self::IdentityProviderDisabled => {
                t!("auth.provider_disabled", locale = locale).to_string()
            },
            Self::ResourceNotFound(name) => {
                t!("resource.not_found", locale = locale, name = name).to_string()
            },
            Self::IdentityProviderUnavailable(_) => {
                t!("auth.provider_unavailable", locale = locale).to_string()
            },
        }
    }

    pub fn localized(self, locale: impl Into<String>) -> LocalizedError {
        LocalizedError { locale: locale.into(), error: self }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub message: String,
}

/// An [`ApiError`] paired with the locale its message is rendered in.
#[derive(Debug)]
pub struct LocalizedError {
    pub locale: String,
    pub error: ApiError,
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.error);
        }
        let body = ApiErrorResponse {
            code: self.error.error_code(),
            message: self.error.localized_message(&self.locale),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.localized(DEFAULT_LOCALE).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
