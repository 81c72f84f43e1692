use super::locale::SupportedLocale;
use super::session::{CookieSet, Session};

/// What the gate does with one request.
///
/// Every variant except `PassThrough` is a redirect. All variants name the
/// locale cookie value to persist; only excluded paths carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough { locale: Option<SupportedLocale> },
    RedirectAddLocale { target: String, query: Option<String>, locale: SupportedLocale },
    RedirectCanonicalize { target: String, query: Option<String>, locale: SupportedLocale },
    RedirectToLogin { target: String, query: String, locale: SupportedLocale },
    RedirectToDashboard { target: String, locale: SupportedLocale },
}

impl GateDecision {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PassThrough { .. } => "pass_through",
            Self::RedirectAddLocale { .. } => "redirect_add_locale",
            Self::RedirectCanonicalize { .. } => "redirect_canonicalize",
            Self::RedirectToLogin { .. } => "redirect_to_login",
            Self::RedirectToDashboard { .. } => "redirect_to_dashboard",
        }
    }

    pub fn locale_cookie(&self) -> Option<&SupportedLocale> {
        match self {
            Self::PassThrough { locale } => locale.as_ref(),
            Self::RedirectAddLocale { locale, .. }
            | Self::RedirectCanonicalize { locale, .. }
            | Self::RedirectToLogin { locale, .. }
            | Self::RedirectToDashboard { locale, .. } => Some(locale),
        }
    }

    /// `Location` header value for redirects, `None` for pass-through.
    pub fn location(&self) -> Option<String> {
        let (target, query) = match self {
            Self::PassThrough { .. } => return None,
            Self::RedirectAddLocale { target, query, .. }
            | Self::RedirectCanonicalize { target, query, .. } => (target, query.as_deref()),
            Self::RedirectToLogin { target, query, .. } => (target, Some(query.as_str())),
            Self::RedirectToDashboard { target, .. } => (target, None),
        };

        Some(match query {
            Some(q) => format!("{}?{}", target, q),
            None => target.clone(),
        })
    }

    pub fn is_redirect(&self) -> bool {
        !matches!(self, Self::PassThrough { .. })
    }
}

/// Decision plus the side-channel state the response writer needs.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub session: Session,
    pub forwarded_cookies: CookieSet,
}

impl GateOutcome {
    pub fn new(decision: GateDecision) -> Self {
        Self { decision, session: Session::Absent, forwarded_cookies: Vec::new() }
    }
}
