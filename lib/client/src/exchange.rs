//! Client side of the session exchange and logout endpoints.

use fitbook_identity::AuthError;
use serde::Deserialize;

/// Client for the server's session endpoints.
///
/// The HTTP client is expected to carry a cookie store so the session
/// credential set by the exchange travels on subsequent requests, the
/// way a browser would send it.
pub struct SessionExchange {
    http: reqwest::Client,
    login_url: String,
    logout_url: String,
}

impl SessionExchange {
    /// Creates a new exchange client.
    #[must_use]
    pub fn new(http: reqwest::Client, login_url: String, logout_url: String) -> Self {
        Self {
            http,
            login_url,
            logout_url,
        }
    }

    /// Exchanges an identity token for a session credential.
    ///
    /// Runs the call fully to completion: the response status has been
    /// received (and with it the session cookie) before this returns
    /// `Ok`, so a caller can never observe "authenticated" before the
    /// server has accepted the cookie.
    pub async fn establish(&self, id_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(&self.login_url)
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = read_error_detail(response).await.unwrap_or_else(|| status.to_string());
        if status.is_server_error() {
            Err(AuthError::ServiceUnavailable { reason: detail })
        } else {
            Err(AuthError::InvalidCredential { reason: detail })
        }
    }

    /// Clears the server-held session credential.
    pub async fn clear(&self) -> Result<(), AuthError> {
        let response = self
            .http
            .post(&self.logout_url)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = read_error_detail(response).await.unwrap_or_else(|| status.to_string());
        Err(AuthError::ServiceUnavailable { reason: detail })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

async fn read_error_detail(response: reqwest::Response) -> Option<String> {
    let body: ErrorBody = response.json().await.ok()?;
    match (body.error, body.detail) {
        (Some(error), Some(detail)) => Some(format!("{error}: {detail}")),
        (Some(error), None) => Some(error),
        (None, Some(detail)) => Some(detail),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_parses_error_and_detail() {
        let json = r#"{"error": "Invalid ID token", "detail": "token has expired"}"#;
        let body: ErrorBody = serde_json::from_str(json).expect("deserialize");
        assert_eq!(body.error.as_deref(), Some("Invalid ID token"));
        assert_eq!(body.detail.as_deref(), Some("token has expired"));
    }

    #[test]
    fn error_body_tolerates_unknown_shape() {
        let body: ErrorBody = serde_json::from_str("{}").expect("deserialize");
        assert!(body.error.is_none());
        assert!(body.detail.is_none());
    }
}
