pub mod error;
pub mod i18n;
pub mod redirect;

pub use error::{ApiError, ApiResult, LocalizedError, SessionError};
pub use i18n::{LOCALE_COOKIE, LOCALE_COOKIE_MAX_AGE_SECS, resolve_locale};
pub use redirect::sanitize_return_to;
