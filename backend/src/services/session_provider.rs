use async_trait::async_trait;
use cookie::{Cookie, SameSite, time::Duration};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::IdentityConfig;
use crate::models::{CookieSet, Identity, RequestCookies, SessionLookup};
use crate::utils::SessionError;

const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 31_536_000;

/// Source of the current session for a request.
///
/// Implementations may hit the network and rotate tokens; rotated cookies
/// come back in [`SessionLookup::cookies_to_forward`].
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, cookies: &RequestCookies) -> Result<SessionLookup, SessionError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: Identity,
}

/// Session provider backed by a GoTrue-compatible identity service.
pub struct HttpSessionProvider {
    http_client: Client,
    base_url: String,
    anon_key: String,
    access_cookie: String,
    refresh_cookie: String,
}

impl HttpSessionProvider {
    pub fn new(config: &IdentityConfig) -> Result<Self, SessionError> {
        if !config.is_enabled() {
            return Err(SessionError::Misconfigured("url and anon_key are required".to_string()));
        }

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.trim().to_string(),
            access_cookie: config.access_cookie.clone(),
            refresh_cookie: config.refresh_cookie.clone(),
        })
    }

    /// `None` when the provider rejects the token.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<Identity>, SessionError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json::<Identity>().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SessionError::unexpected_status(status, body))
            },
        }
    }

    /// `None` when the refresh token is no longer accepted.
    async fn refresh(&self, refresh_token: &str) -> Result<Option<TokenResponse>, SessionError> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json::<TokenResponse>().await?)),
            status if status.is_client_error() => {
                tracing::debug!("Refresh token rejected by identity provider ({})", status);
                Ok(None)
            },
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SessionError::unexpected_status(status, body))
            },
        }
    }

    fn session_cookie(name: &str, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((name.to_string(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(max_age_secs))
            .build()
    }

    fn rotated_cookies(&self, tokens: &TokenResponse) -> CookieSet {
        vec![
            Self::session_cookie(&self.access_cookie, tokens.access_token.clone(), tokens.expires_in),
            Self::session_cookie(
                &self.refresh_cookie,
                tokens.refresh_token.clone(),
                REFRESH_COOKIE_MAX_AGE_SECS,
            ),
        ]
    }

    fn cleared_cookies(&self) -> CookieSet {
        vec![
            Self::session_cookie(&self.access_cookie, String::new(), 0),
            Self::session_cookie(&self.refresh_cookie, String::new(), 0),
        ]
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn get_session(&self, cookies: &RequestCookies) -> Result<SessionLookup, SessionError> {
        let access_token = cookies.get(&self.access_cookie).filter(|t| !t.is_empty());
        let refresh_token = cookies.get(&self.refresh_cookie).filter(|t| !t.is_empty());

        if let Some(token) = access_token
            && let Some(identity) = self.fetch_user(token).await?
        {
            tracing::debug!("Session resolved for user {}", identity.id);
            return Ok(SessionLookup::present(identity));
        }

        let Some(refresh_token) = refresh_token else {
            if access_token.is_some() {
                // stale access cookie with nothing to refresh it
                return Ok(SessionLookup::absent().with_cookies(self.cleared_cookies()));
            }
            return Ok(SessionLookup::absent());
        };

        match self.refresh(refresh_token).await? {
            Some(tokens) => {
                tracing::debug!("Session refreshed for user {}", tokens.user.id);
                let cookies = self.rotated_cookies(&tokens);
                Ok(SessionLookup::present(tokens.user).with_cookies(cookies))
            },
            None => Ok(SessionLookup::absent().with_cookies(self.cleared_cookies())),
        }
    }
}
