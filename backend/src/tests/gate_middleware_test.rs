use axum::http::StatusCode;
use std::sync::Arc;

use crate::config::ProviderFailurePolicy;
use crate::tests::common::{
    StubProvider, body_json, create_test_app, create_test_gate, location, rotated_cookie,
    send_get, set_cookies,
};

fn signed_in_app() -> axum::Router {
    let provider = Arc::new(StubProvider::new().with_user("good", "user-1"));
    create_test_app(create_test_gate(Some(provider), ProviderFailurePolicy::Closed))
}

#[tokio::test]
async fn test_missing_locale_redirects_with_cookie() {
    let response = send_get(signed_in_app(), "/pricing?plan=pro", None, Some("fr-CA,fr;q=0.9")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/fr/pricing?plan=pro"));
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("NEXT_LOCALE=fr"));
    assert!(cookies[0].contains("Max-Age=31536000"));
}

#[tokio::test]
async fn test_duplicate_locale_redirect() {
    let response = send_get(signed_in_app(), "/en/fr/pricing", None, None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/fr/pricing"));
}

#[tokio::test]
async fn test_protected_path_redirects_to_login() {
    let response = send_get(signed_in_app(), "/en/dashboard", Some("NEXT_LOCALE=en"), None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/en/login?returnTo=%2Fdashboard"));
    assert!(set_cookies(&response)[0].starts_with("NEXT_LOCALE=en"));
}

#[tokio::test]
async fn test_login_with_session_redirects_to_dashboard() {
    let response =
        send_get(signed_in_app(), "/en/login", Some("sb-access-token=good"), None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/en/dashboard"));
}

#[tokio::test]
async fn test_api_passes_untouched() {
    let provider = Arc::new(StubProvider::new().rotating(vec![rotated_cookie()]));
    let app = create_test_app(create_test_gate(Some(Arc::clone(&provider)), ProviderFailurePolicy::Closed));

    let response = send_get(app, "/api/anything", Some("NEXT_LOCALE=fr"), Some("es")).await;

    assert!(location(&response).is_none());
    assert!(set_cookies(&response).is_empty());
    // unknown API routes reach the fallback untouched
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(create_test_gate(None, ProviderFailurePolicy::Closed));
    let response = send_get(app, "/api/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["identity_provider"], false);
    assert_eq!(body["locales"][3], "pt-BR");
}

#[tokio::test]
async fn test_page_receives_locale_and_identity() {
    let provider = Arc::new(
        StubProvider::new().with_user("good", "user-1").rotating(vec![rotated_cookie()]),
    );
    let app = create_test_app(create_test_gate(Some(provider), ProviderFailurePolicy::Closed));

    let response =
        send_get(app, "/es/dashboard", Some("sb-access-token=good; NEXT_LOCALE=fr"), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies[0].starts_with("NEXT_LOCALE=es"));
    assert!(cookies[1].starts_with("sb-access-token=rotated-token"));

    let body = body_json(response).await;
    assert_eq!(body["path"], "/es/dashboard");
    assert_eq!(body["locale"], "es");
    assert_eq!(body["user_id"], "user-1");
}

#[tokio::test]
async fn test_login_redirect_forwards_rotated_cookies() {
    let provider = Arc::new(StubProvider::new().rotating(vec![rotated_cookie()]));
    let app = create_test_app(create_test_gate(Some(provider), ProviderFailurePolicy::Closed));

    let response = send_get(app, "/fr/settings", None, None).await;

    assert_eq!(location(&response).as_deref(), Some("/fr/login?returnTo=%2Fsettings"));
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies[1].starts_with("sb-access-token=rotated-token"));
}

#[tokio::test]
async fn test_disabled_provider_serves_protected_pages() {
    let app = create_test_app(create_test_gate(None, ProviderFailurePolicy::Closed));
    let response = send_get(app, "/en/dashboard", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response)[0].starts_with("NEXT_LOCALE=en"));
}

#[tokio::test]
async fn test_auth_callback_guards_return_to() {
    let app = || create_test_app(create_test_gate(None, ProviderFailurePolicy::Closed));

    let response = send_get(app(), "/auth/callback?returnTo=%2Ffr%2Fbilling", None, None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/fr/billing"));
    assert!(set_cookies(&response).is_empty());

    let response =
        send_get(app(), "/auth/callback?returnTo=%2F%2Fevil.example", None, None).await;
    assert_eq!(location(&response).as_deref(), Some("/en/dashboard"));

    let response =
        send_get(app(), "/auth/callback?returnTo=https%3A%2F%2Fevil.example", None, None).await;
    assert_eq!(location(&response).as_deref(), Some("/en/dashboard"));

    let response = send_get(app(), "/auth/callback", None, None).await;
    assert_eq!(location(&response).as_deref(), Some("/en/dashboard"));
}

#[tokio::test]
async fn test_session_endpoint() {
    let response = send_get(signed_in_app(), "/api/session", Some("sb-access-token=good"), Some("pt")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], "user-1");
    assert_eq!(body["locale"], "pt-BR");

    let response = send_get(signed_in_app(), "/api/session", Some("NEXT_LOCALE=fr"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 1001);
    assert_eq!(body["message"], "Aucune session active");
}

#[tokio::test]
async fn test_session_endpoint_without_provider() {
    let app = create_test_app(create_test_gate(None, ProviderFailurePolicy::Closed));
    let response = send_get(app, "/api/session", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 1002);
}
