pub mod decision;
pub mod locale;
pub mod request;
pub mod session;

pub use decision::{GateDecision, GateOutcome};
pub use locale::{LocaleSet, LocaleSetError, SupportedLocale};
pub use request::{RequestCookies, RequestDescriptor};
pub use session::{CookieSet, Identity, Session, SessionLookup};
