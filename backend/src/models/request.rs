use axum::http::{HeaderMap, Uri, header};
use cookie::Cookie;
use std::collections::HashMap;

use crate::utils::i18n::LOCALE_COOKIE;

/// Cookie name/value pairs sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies(HashMap<String, String>);

impl RequestCookies {
    /// Collect cookies from every `Cookie` header. Unparseable pairs are skipped
    /// and the first occurrence of a name wins.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = HashMap::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            for cookie in Cookie::split_parse(raw).flatten() {
                cookies
                    .entry(cookie.name().to_string())
                    .or_insert_with(|| cookie.value().to_string());
            }
        }
        Self(cookies)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestCookies
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Immutable view of an inbound request, everything the gate decides on.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    path: String,
    query: Option<String>,
    cookies: RequestCookies,
    accept_language: Option<String>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.is_empty() { "/".to_string() } else { path };
        Self { path, query: None, cookies: RequestCookies::default(), accept_language: None }
    }

    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self::new(uri.path())
            .with_query(uri.query())
            .with_cookies(RequestCookies::from_headers(headers))
            .with_accept_language(accept_language)
    }

    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.filter(|q| !q.is_empty()).map(str::to_string);
        self
    }

    pub fn with_cookies(mut self, cookies: RequestCookies) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name, value);
        self
    }

    pub fn with_accept_language(mut self, value: Option<String>) -> Self {
        self.accept_language = value;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn cookies(&self) -> &RequestCookies {
        &self.cookies
    }

    pub fn accept_language(&self) -> Option<&str> {
        self.accept_language.as_deref()
    }

    /// Value of the persisted locale cookie, unvalidated.
    pub fn locale_cookie(&self) -> Option<&str> {
        self.cookies.get(LOCALE_COOKIE)
    }
}
