//! Access gate for protected paths.
//!
//! Runs before request handling for the configured protected path
//! prefixes; everything else bypasses the gate entirely. The gate is
//! pure pass/redirect: it attaches the resolved identity for downstream
//! handlers and performs no business logic.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use super::{AppState, cookie};

/// Middleware enforcing a valid session on protected paths.
///
/// Requests without a valid session credential are redirected to the
/// login path. A present-but-invalid cookie takes exactly the same
/// redirect as a missing one, so the gate never leaks whether a stale
/// cookie existed.
pub async fn access_gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !state.session.is_protected(&path) {
        return next.run(request).await;
    }

    let Some(credential) = cookie::session_value(&jar) else {
        return Redirect::to(&state.session.login_path).into_response();
    };

    match state.identity.verify_session_cookie(&credential).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(path = %path, error = %err, "rejected session credential on protected path");
            Redirect::to(&state.session.login_path).into_response()
        }
    }
}
