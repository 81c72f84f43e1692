use crate::models::{LocaleSet, SupportedLocale};

/// A list of path prefixes matched on segment boundaries: `/api` matches
/// `/api` and `/api/x` but not `/apix`.
#[derive(Debug, Clone, Default)]
pub struct PathPrefixes(Vec<String>);

impl PathPrefixes {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            prefixes
                .into_iter()
                .map(|p| {
                    let p = p.as_ref().trim_end_matches('/');
                    if p.is_empty() { "/".to_string() } else { p.to_string() }
                })
                .collect(),
        )
    }

    pub fn matches(&self, path: &str) -> bool {
        self.0.iter().any(|prefix| {
            prefix == "/"
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|remainder| remainder.is_empty() || remainder.starts_with('/'))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// Never gated: APIs, auth callback, framework assets, static files
    Excluded,
    /// First segment is not a supported locale
    NeedsLocale,
    /// Exactly one locale prefix; `rest` is the path without it, at least `/`
    Canonical { locale: SupportedLocale, rest: String },
    /// Stacked locale prefixes; `corrected` keeps only the innermost one
    DuplicateLocale { locale: SupportedLocale, corrected: String },
}

/// Splits the locale prefix off request paths and spots malformed ones.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    locales: LocaleSet,
    excluded: PathPrefixes,
}

impl PathClassifier {
    pub fn new(locales: LocaleSet, excluded: PathPrefixes) -> Self {
        Self { locales, excluded }
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if self.excluded.matches(path) || is_static_asset(path) {
            return PathClass::Excluded;
        }

        let (first, mut rest) = split_first_segment(path);
        let Some(mut locale) = self.locales.get(first) else {
            return PathClass::NeedsLocale;
        };

        // `/en/fr/de/x` collapses to `/de/x` in one step.
        let mut stacked = false;
        loop {
            let (next, remainder) = split_first_segment(rest);
            match self.locales.get(next) {
                Some(inner) => {
                    locale = inner;
                    rest = remainder;
                    stacked = true;
                },
                None => break,
            }
        }

        let rest = if rest.is_empty() { "/" } else { rest };
        if stacked {
            PathClass::DuplicateLocale {
                locale: locale.clone(),
                corrected: localized_path(locale, rest),
            }
        } else {
            PathClass::Canonical { locale: locale.clone(), rest: rest.to_string() }
        }
    }
}

/// `/{locale}{path}`, with the root path adding no trailing segment.
pub fn localized_path(locale: &SupportedLocale, path: &str) -> String {
    match path {
        "" | "/" => format!("/{}", locale),
        p if p.starts_with('/') => format!("/{}{}", locale, p),
        p => format!("/{}/{}", locale, p),
    }
}

/// Static file heuristic: the last segment has a dot in it.
pub fn is_static_asset(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// `("en", "/fr/x")` for `/en/fr/x`; the remainder keeps its leading slash.
fn split_first_segment(path: &str) -> (&str, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    }
}
