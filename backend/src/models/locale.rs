use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A locale tag that belongs to a [`LocaleSet`].
///
/// Values are only handed out by the set, so holding one means the tag is
/// a valid locale segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SupportedLocale(Arc<str>);

impl SupportedLocale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SupportedLocale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SupportedLocale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocaleSetError {
    #[error("at least one supported locale is required")]
    Empty,

    #[error("locale '{0}' is listed more than once")]
    Duplicate(String),

    #[error("locale tag '{0}' is not usable as a path segment")]
    InvalidTag(String),

    #[error("default locale '{0}' is not in the supported list")]
    UnknownDefault(String),
}

/// Closed, ordered set of supported locales with one default.
#[derive(Debug, Clone)]
pub struct LocaleSet {
    locales: Vec<SupportedLocale>,
    default_index: usize,
}

impl LocaleSet {
    pub fn new<I, S>(tags: I, default_locale: &str) -> Result<Self, LocaleSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locales: Vec<SupportedLocale> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            if tag.is_empty() || tag.contains(['/', '.', '?', '#']) || tag.contains(char::is_whitespace)
            {
                return Err(LocaleSetError::InvalidTag(tag.to_string()));
            }
            if locales.iter().any(|l| l.as_str() == tag) {
                return Err(LocaleSetError::Duplicate(tag.to_string()));
            }
            locales.push(SupportedLocale(Arc::from(tag)));
        }

        if locales.is_empty() {
            return Err(LocaleSetError::Empty);
        }

        let default_index = locales
            .iter()
            .position(|l| l.as_str() == default_locale)
            .ok_or_else(|| LocaleSetError::UnknownDefault(default_locale.to_string()))?;

        Ok(Self { locales, default_index })
    }

    /// Look up a tag; exact, case-sensitive match.
    pub fn get(&self, tag: &str) -> Option<&SupportedLocale> {
        self.locales.iter().find(|l| l.as_str() == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// First supported locale that extends `tag` with a subtag, e.g. `pt` → `pt-BR`.
    pub fn find_by_prefix(&self, tag: &str) -> Option<&SupportedLocale> {
        self.locales.iter().find(|l| {
            l.as_str()
                .strip_prefix(tag)
                .is_some_and(|remainder| remainder.starts_with('-'))
        })
    }

    pub fn default_locale(&self) -> &SupportedLocale {
        &self.locales[self.default_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SupportedLocale> {
        self.locales.iter()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}
