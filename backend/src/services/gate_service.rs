use std::sync::Arc;

use crate::config::{Config, ProviderFailurePolicy};
use crate::models::{
    GateDecision, GateOutcome, LocaleSet, RequestDescriptor, Session, SessionLookup,
    SupportedLocale,
};
use crate::services::path_classifier::{PathClass, PathClassifier, PathPrefixes, localized_path};
use crate::services::session_provider::{HttpSessionProvider, SessionProvider};
use crate::utils::redirect::RETURN_TO_PARAM;
use crate::utils::resolve_locale;

const LOGIN_PATH: &str = "/login";
const DASHBOARD_PATH: &str = "/dashboard";

/// First stage of a decision: either final, or waiting on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Decided(GateDecision),
    NeedsSession { locale: SupportedLocale, rest: String },
}

/// The locale & access gate.
///
/// Built once at startup and shared across requests. `provider` is the
/// identity-provider capability: `None` turns session checks off and every
/// canonical path passes through.
pub struct LocaleGate {
    classifier: PathClassifier,
    protected: PathPrefixes,
    failure_policy: ProviderFailurePolicy,
    provider: Option<Arc<dyn SessionProvider>>,
}

impl LocaleGate {
    pub fn new(
        classifier: PathClassifier,
        protected: PathPrefixes,
        failure_policy: ProviderFailurePolicy,
        provider: Option<Arc<dyn SessionProvider>>,
    ) -> Self {
        Self { classifier, protected, failure_policy, provider }
    }

    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let classifier = PathClassifier::new(
            config.locale_set()?,
            PathPrefixes::new(&config.gate.excluded_paths),
        );

        let provider: Option<Arc<dyn SessionProvider>> = if config.identity.is_enabled() {
            tracing::info!("Identity provider enabled: {}", config.identity.url);
            Some(Arc::new(HttpSessionProvider::new(&config.identity)?))
        } else {
            None
        };

        Ok(Self::new(
            classifier,
            PathPrefixes::new(&config.gate.protected_paths),
            config.gate.provider_failure,
            provider,
        ))
    }

    pub fn locales(&self) -> &LocaleSet {
        self.classifier.locales()
    }

    pub fn identity_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider(&self) -> Option<&Arc<dyn SessionProvider>> {
        self.provider.as_ref()
    }

    pub fn is_protected(&self, rest: &str) -> bool {
        self.protected.matches(rest)
    }

    /// Locale for a request, from its cookie and Accept-Language header.
    pub fn resolve_locale(&self, req: &RequestDescriptor) -> SupportedLocale {
        resolve_locale(self.locales(), req.locale_cookie(), req.accept_language())
    }

    /// Everything decidable without a session lookup.
    pub fn route(&self, req: &RequestDescriptor) -> Route {
        let decision = match self.classifier.classify(req.path()) {
            PathClass::Excluded => GateDecision::PassThrough { locale: None },
            PathClass::NeedsLocale => {
                let locale = self.resolve_locale(req);
                GateDecision::RedirectAddLocale {
                    target: localized_path(&locale, req.path()),
                    query: req.query().map(str::to_string),
                    locale,
                }
            },
            PathClass::DuplicateLocale { locale, corrected } => GateDecision::RedirectCanonicalize {
                target: corrected,
                query: req.query().map(str::to_string),
                locale,
            },
            PathClass::Canonical { locale, rest } => {
                if self.provider.is_none() {
                    GateDecision::PassThrough { locale: Some(locale) }
                } else {
                    return Route::NeedsSession { locale, rest };
                }
            },
        };
        Route::Decided(decision)
    }

    /// Decision for a canonical path once the session is known.
    pub fn decide_for_session(
        &self,
        req: &RequestDescriptor,
        locale: SupportedLocale,
        rest: &str,
        session: &Session,
    ) -> GateDecision {
        if rest == LOGIN_PATH && session.is_present() {
            return GateDecision::RedirectToDashboard {
                target: localized_path(&locale, DASHBOARD_PATH),
                locale,
            };
        }

        if !session.is_present() && self.is_protected(rest) {
            let return_to = match req.query() {
                Some(query) => format!("{}?{}", rest, query),
                None => rest.to_string(),
            };
            return GateDecision::RedirectToLogin {
                target: localized_path(&locale, LOGIN_PATH),
                query: format!("{}={}", RETURN_TO_PARAM, urlencoding::encode(&return_to)),
                locale,
            };
        }

        GateDecision::PassThrough { locale: Some(locale) }
    }

    /// Run the gate for one request.
    pub async fn evaluate(&self, req: &RequestDescriptor) -> GateOutcome {
        let (locale, rest) = match self.route(req) {
            Route::Decided(decision) => return GateOutcome::new(decision),
            Route::NeedsSession { locale, rest } => (locale, rest),
        };

        let Some(provider) = self.provider.as_ref() else {
            return GateOutcome::new(GateDecision::PassThrough { locale: Some(locale) });
        };

        let lookup = match provider.get_session(req.cookies()).await {
            Ok(lookup) => lookup,
            Err(e) => match self.failure_policy {
                ProviderFailurePolicy::Closed => {
                    tracing::warn!("Session lookup failed for {}, treating as signed out: {}", req.path(), e);
                    SessionLookup::absent()
                },
                ProviderFailurePolicy::Open => {
                    tracing::warn!("Session lookup failed for {}, letting request through: {}", req.path(), e);
                    return GateOutcome::new(GateDecision::PassThrough { locale: Some(locale) });
                },
            },
        };

        let decision = self.decide_for_session(req, locale, &rest, &lookup.session);
        GateOutcome { decision, session: lookup.session, forwarded_cookies: lookup.cookies_to_forward }
    }
}
