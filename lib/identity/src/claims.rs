//! Decoded identity assertions.
//!
//! Two claim shapes flow through the system:
//! - `IdTokenClaims`: the decoded result of verifying a short-lived
//!   identity token issued by the provider at login time.
//! - `AuthenticatedIdentity`: the decoded result of verifying a session
//!   credential. Derived on every verification, never stored.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Sign-in provider value used for email/password accounts.
pub const PASSWORD_PROVIDER: &str = "password";

/// Claims extracted from a verified identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdTokenClaims {
    /// Unique user identifier assigned by the provider.
    pub uid: String,
    /// Email address, if the account has one.
    pub email: Option<String>,
    /// Whether the account's email address has been verified.
    pub email_verified: bool,
    /// Which sign-in method produced this token (e.g. "password",
    /// "google.com").
    pub sign_in_provider: Option<String>,
}

impl IdTokenClaims {
    /// Returns true if this token was issued for a federated login
    /// rather than an email/password one.
    #[must_use]
    pub fn is_federated(&self) -> bool {
        self.sign_in_provider
            .as_deref()
            .is_some_and(|p| p != PASSWORD_PROVIDER)
    }
}

/// The identity established by a verified session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Unique user identifier assigned by the provider.
    pub uid: String,
    /// Email address, if the account has one.
    pub email: Option<String>,
}

/// Decodes a JWT payload without verifying its signature.
///
/// This must never be used to establish trust in a token; the one
/// legitimate use is a client inspecting claims of a token its own
/// provider just handed it (e.g. the sign-in provider name).
pub fn peek_payload(token: &str) -> Result<serde_json::Value, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidCredential {
            reason: "not a JWT".to_string(),
        });
    }

    let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::InvalidCredential {
            reason: format!("undecodable JWT payload: {e}"),
        })?;

    serde_json::from_slice(&payload_bytes).map_err(|e| AuthError::InvalidCredential {
        reason: format!("unparsable JWT payload: {e}"),
    })
}

/// Reads the sign-in provider name from an unverified identity token.
///
/// Returns `None` when the token carries no provider information.
#[must_use]
pub fn peek_sign_in_provider(token: &str) -> Option<String> {
    let payload = peek_payload(token).ok()?;
    payload
        .get("firebase")
        .and_then(|v| v.get("sign_in_provider"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_jwt(payload: serde_json::Value) -> String {
        let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = engine.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn password_token_is_not_federated() {
        let claims = IdTokenClaims {
            uid: "alice-uid".to_string(),
            email: Some("alice@example.com".to_string()),
            email_verified: true,
            sign_in_provider: Some("password".to_string()),
        };
        assert!(!claims.is_federated());
    }

    #[test]
    fn google_token_is_federated() {
        let claims = IdTokenClaims {
            uid: "bob-uid".to_string(),
            email: Some("bob@example.com".to_string()),
            email_verified: false,
            sign_in_provider: Some("google.com".to_string()),
        };
        assert!(claims.is_federated());
    }

    #[test]
    fn unknown_provider_is_not_federated() {
        let claims = IdTokenClaims {
            uid: "u".to_string(),
            email: None,
            email_verified: false,
            sign_in_provider: None,
        };
        assert!(!claims.is_federated());
    }

    #[test]
    fn peek_payload_decodes_claims() {
        let token = fake_jwt(serde_json::json!({"sub": "alice-uid", "aud": "demo"}));
        let payload = peek_payload(&token).expect("should decode");
        assert_eq!(payload["sub"], "alice-uid");
    }

    #[test]
    fn peek_payload_rejects_non_jwt() {
        let result = peek_payload("not-a-token");
        assert!(matches!(
            result,
            Err(AuthError::InvalidCredential { .. })
        ));
    }

    #[test]
    fn peek_sign_in_provider_reads_nested_claim() {
        let token = fake_jwt(serde_json::json!({
            "sub": "bob-uid",
            "firebase": {"sign_in_provider": "google.com"}
        }));
        assert_eq!(
            peek_sign_in_provider(&token),
            Some("google.com".to_string())
        );
    }

    #[test]
    fn peek_sign_in_provider_absent() {
        let token = fake_jwt(serde_json::json!({"sub": "bob-uid"}));
        assert_eq!(peek_sign_in_provider(&token), None);
    }

    #[test]
    fn authenticated_identity_serde_roundtrip() {
        let identity = AuthenticatedIdentity {
            uid: "alice-uid".to_string(),
            email: Some("alice@example.com".to_string()),
        };
        let json = serde_json::to_string(&identity).expect("serialize");
        let parsed: AuthenticatedIdentity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(identity, parsed);
    }
}
