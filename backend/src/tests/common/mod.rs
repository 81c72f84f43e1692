// Common test utilities and helpers

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use cookie::Cookie;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

use crate::config::ProviderFailurePolicy;
use crate::models::{CookieSet, Identity, LocaleSet, RequestCookies, SessionLookup};
use crate::services::{LocaleGate, PathClassifier, PathPrefixes, SessionProvider};
use crate::utils::SessionError;
use crate::{AppState, build_router};

pub const SESSION_COOKIE: &str = "sb-access-token";

pub fn test_locales() -> LocaleSet {
    LocaleSet::new(["en", "fr", "es", "pt-BR"], "en").expect("Failed to build locale set")
}

pub fn identity(id: &str) -> Identity {
    Identity { id: id.to_string(), email: Some(format!("{}@test.com", id)) }
}

/// In-memory session provider that records how often it is asked.
#[derive(Default)]
pub struct StubProvider {
    sessions: Vec<(String, Identity)>,
    rotated: CookieSet,
    fail: bool,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` in the session cookie as `id`.
    pub fn with_user(mut self, token: &str, id: &str) -> Self {
        self.sessions.push((token.to_string(), identity(id)));
        self
    }

    /// Issue these cookies on every lookup.
    pub fn rotating(mut self, cookies: CookieSet) -> Self {
        self.rotated = cookies;
        self
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for StubProvider {
    async fn get_session(&self, cookies: &RequestCookies) -> Result<SessionLookup, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SessionError::Misconfigured("stub provider is down".to_string()));
        }

        let lookup = cookies
            .get(SESSION_COOKIE)
            .and_then(|token| self.sessions.iter().find(|(t, _)| t == token))
            .map(|(_, identity)| SessionLookup::present(identity.clone()))
            .unwrap_or_default();
        Ok(lookup.with_cookies(self.rotated.clone()))
    }
}

pub fn rotated_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "rotated-token")).path("/").http_only(true).build()
}

/// Gate with the test locales, default excluded prefixes and `/dashboard`,
/// `/settings` protected.
pub fn create_test_gate(
    provider: Option<Arc<StubProvider>>,
    policy: ProviderFailurePolicy,
) -> LocaleGate {
    let provider = provider.map(|p| p as Arc<dyn SessionProvider>);
    LocaleGate::new(
        PathClassifier::new(
            test_locales(),
            PathPrefixes::new(["/api", "/auth/callback", "/_next"]),
        ),
        PathPrefixes::new(["/dashboard", "/settings"]),
        policy,
        provider,
    )
}

pub fn create_test_app(gate: LocaleGate) -> Router {
    build_router(Arc::new(AppState::new(gate)))
}

/// Send a GET through the router. `cookie` is a raw `Cookie` header value.
pub async fn send_get(
    app: Router,
    uri: &str,
    cookie: Option<&str>,
    accept_language: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(lang) = accept_language {
        builder = builder.header(header::ACCEPT_LANGUAGE, lang);
    }
    let request = builder.body(Body::empty()).expect("Failed to build request");
    app.oneshot(request).await.expect("Router failed")
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().expect("Location is not ASCII").to_string())
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("Set-Cookie is not ASCII").to_string())
        .collect()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
