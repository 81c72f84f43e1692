//! Locale resolution for inbound requests
//!
//! Picks one supported locale from the persisted locale cookie and the
//! Accept-Language header. Header order decides preference; quality weights
//! are ignored.

use crate::models::{LocaleSet, SupportedLocale};

/// Cookie that persists the visitor's locale
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";
/// One year
pub const LOCALE_COOKIE_MAX_AGE_SECS: i64 = 31_536_000;

pub const DEFAULT_SUPPORTED_LOCALES: &[&str] = &["en", "fr", "es", "de", "pt-BR"];
pub const DEFAULT_LOCALE: &str = "en";

/// Resolve the locale for a request. First match wins:
/// 1. a supported cookie value
/// 2. each Accept-Language tag in listed order, exact then `tag-` prefix
/// 3. the default locale
pub fn resolve_locale(
    locales: &LocaleSet,
    cookie_value: Option<&str>,
    language_header: Option<&str>,
) -> SupportedLocale {
    if let Some(locale) = cookie_value.and_then(|value| locales.get(value)) {
        return locale.clone();
    }

    for tag in language_tags(language_header.unwrap_or_default()) {
        if let Some(locale) = locales.get(tag).or_else(|| locales.find_by_prefix(tag)) {
            return locale.clone();
        }
    }

    locales.default_locale().clone()
}

/// Language tags from an Accept-Language value, in listed order, with any
/// `;q=` suffix dropped. Empty fragments are skipped.
pub fn language_tags(header_value: &str) -> impl Iterator<Item = &str> {
    header_value
        .split(',')
        .filter_map(|fragment| fragment.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
}
