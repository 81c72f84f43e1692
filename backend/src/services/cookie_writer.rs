use axum::http::{
    HeaderMap, HeaderValue,
    header::{InvalidHeaderValue, SET_COOKIE},
};
use cookie::{Cookie, time::Duration};

use crate::models::SupportedLocale;
use crate::utils::i18n::{LOCALE_COOKIE, LOCALE_COOKIE_MAX_AGE_SECS};

pub fn locale_cookie(locale: &SupportedLocale) -> Cookie<'static> {
    Cookie::build((LOCALE_COOKIE, locale.to_string()))
        .path("/")
        .max_age(Duration::seconds(LOCALE_COOKIE_MAX_AGE_SECS))
        .build()
}

/// Locale cookie first, then provider cookies in the order they were issued.
pub fn response_cookies(
    locale: Option<&SupportedLocale>,
    forwarded: &[Cookie<'static>],
) -> Vec<Cookie<'static>> {
    locale.map(locale_cookie).into_iter().chain(forwarded.iter().cloned()).collect()
}

/// Append every cookie as a `Set-Cookie` header, or none of them.
///
/// All values are encoded before the map is touched, so a bad cookie leaves
/// `headers` unchanged.
pub fn apply_cookies(
    headers: &mut HeaderMap,
    cookies: &[Cookie<'_>],
) -> Result<usize, InvalidHeaderValue> {
    let values = cookies
        .iter()
        .map(|c| HeaderValue::from_str(&c.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    let written = values.len();
    for value in values {
        headers.append(SET_COOKIE, value);
    }
    Ok(written)
}

/// Final stage of the gate: write the locale and forwarded cookies.
pub fn write_response_cookies(
    headers: &mut HeaderMap,
    locale: Option<&SupportedLocale>,
    forwarded: &[Cookie<'static>],
) {
    let cookies = response_cookies(locale, forwarded);
    if cookies.is_empty() {
        return;
    }
    if let Err(e) = apply_cookies(headers, &cookies) {
        tracing::warn!("Dropping {} response cookies, one is not a valid header: {}", cookies.len(), e);
    }
}
