//! Open-redirect guard for the `returnTo` parameter

pub const RETURN_TO_PARAM: &str = "returnTo";

/// Accept `return_to` only as a same-origin absolute path.
///
/// Anything that does not start with a single `/` (including protocol-relative
/// `//host` and the `/\host` variant browsers normalize the same way) is
/// replaced by `fallback`.
pub fn sanitize_return_to(return_to: Option<&str>, fallback: &str) -> String {
    match return_to {
        Some(value) if is_local_path(value) => value.to_string(),
        Some(value) => {
            tracing::warn!("Discarding non-local returnTo value: {:?}", value);
            fallback.to_string()
        },
        None => fallback.to_string(),
    }
}

fn is_local_path(value: &str) -> bool {
    value.starts_with('/')
        && !value.starts_with("//")
        && !value.starts_with("/\\")
        && !value.chars().any(char::is_control)
}
