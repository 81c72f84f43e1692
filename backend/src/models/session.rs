use cookie::Cookie;
use serde::{Deserialize, Serialize};

/// Cookies a response must carry, in write order.
pub type CookieSet = Vec<Cookie<'static>>;

/// Authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    Present(Identity),
    #[default]
    Absent,
}

impl Session {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Present(identity) => Some(identity),
            Self::Absent => None,
        }
    }
}

/// Result of one session lookup: the session plus any cookies the provider
/// rotated while reading it. The cookies must reach the client on whatever
/// response is finally returned.
#[derive(Debug, Clone, Default)]
pub struct SessionLookup {
    pub session: Session,
    pub cookies_to_forward: CookieSet,
}

impl SessionLookup {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn present(identity: Identity) -> Self {
        Self { session: Session::Present(identity), cookies_to_forward: Vec::new() }
    }

    pub fn with_cookies(mut self, cookies: CookieSet) -> Self {
        self.cookies_to_forward = cookies;
        self
    }
}
