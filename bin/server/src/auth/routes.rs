//! Session exchange, validation, and logout handlers.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use fitbook_identity::{AuthError, AuthenticatedIdentity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AppState, cookie};
use crate::error::ApiError;

/// Request body for the session exchange.
#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    /// Identity token issued by the provider at login time.
    #[serde(rename = "idToken", default)]
    pub id_token: String,
}

/// Exchanges a client-side identity token for a session cookie.
///
/// This is an explicit user action expecting success, so credential
/// problems are hard errors here (unlike at the validation boundary).
pub async fn session_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<ExchangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.id_token.is_empty() {
        return Err(ApiError::MissingIdToken);
    }

    state
        .identity
        .verify_id_token(&body.id_token)
        .await
        .map_err(|err| exchange_error(err, state.dev_errors))?;

    let ttl = chrono::Duration::seconds(state.session.ttl_seconds);
    let credential = state
        .identity
        .create_session_cookie(&body.id_token, ttl)
        .await
        .map_err(|err| exchange_error(err, state.dev_errors))?;

    let cookie = cookie::issue(
        credential,
        time::Duration::seconds(state.session.ttl_seconds),
        state.session.secure_cookies,
    );

    Ok((jar.add(cookie), Json(serde_json::json!({"ok": true}))))
}

fn exchange_error(err: AuthError, dev_errors: bool) -> ApiError {
    match err {
        AuthError::ServiceUnavailable { .. } | AuthError::NetworkFailure { .. } => {
            tracing::error!(error = %err, "session exchange failed");
            ApiError::Internal {
                detail: dev_errors.then(|| err.to_string()),
            }
        }
        other => ApiError::InvalidIdToken {
            detail: other.to_string(),
        },
    }
}

/// The caller's authentication state as reported by the validator.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionStatus {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            uid: None,
            email: None,
        }
    }

    fn authenticated(identity: AuthenticatedIdentity) -> Self {
        Self {
            authenticated: true,
            uid: Some(identity.uid),
            email: identity.email,
        }
    }
}

/// Reports the caller's authentication state.
///
/// An anonymous visitor is an expected state, so a missing or invalid
/// cookie yields `authenticated: false` with status 200, never an
/// error. Invalid cookies are logged and otherwise indistinguishable
/// from absent ones.
pub async fn me(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<SessionStatus> {
    let Some(credential) = cookie::session_value(&jar) else {
        return Json(SessionStatus::anonymous());
    };

    match state.identity.verify_session_cookie(&credential).await {
        Ok(identity) => Json(SessionStatus::authenticated(identity)),
        Err(err) => {
            tracing::warn!(error = %err, "session verification failed");
            Json(SessionStatus::anonymous())
        }
    }
}

/// Clears the session cookie.
pub async fn session_logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(cookie::clear()),
        Json(serde_json::json!({"ok": true})),
    )
}
