//! Locale & access gate middleware
//!
//! Runs the gate on every request, answers with a redirect when the URL is
//! not canonical or a session is required, and writes the locale and any
//! rotated session cookies onto the final response.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::models::{GateOutcome, RequestDescriptor};
use crate::services::LocaleGate;
use crate::services::cookie_writer::write_response_cookies;

pub async fn locale_gate_middleware(
    State(gate): State<Arc<LocaleGate>>,
    mut req: Request,
    next: Next,
) -> Response {
    let descriptor = RequestDescriptor::from_parts(req.uri(), req.headers());
    tracing::debug!("Gate processing: {} {}", req.method(), descriptor.path());

    let GateOutcome { decision, session, forwarded_cookies } = gate.evaluate(&descriptor).await;
    let locale = decision.locale_cookie().cloned();

    let mut response = match decision.location() {
        Some(location) => {
            tracing::debug!("Gate {} for {}: {}", decision.name(), descriptor.path(), location);
            Redirect::temporary(&location).into_response()
        },
        None => {
            // Let page rendering see what the gate resolved.
            if let Some(locale) = &locale {
                req.extensions_mut().insert(locale.clone());
            }
            if let Some(identity) = session.identity() {
                req.extensions_mut().insert(identity.clone());
            }
            next.run(req).await
        },
    };

    write_response_cookies(response.headers_mut(), locale.as_ref(), &forwarded_cookies);
    response
}
