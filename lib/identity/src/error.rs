//! Error taxonomy for authentication operations.
//!
//! A single enum covers the whole authentication surface so that the
//! server's exchange/validation boundaries and the client's login flows
//! agree on failure kinds. Propagation policy differs per boundary:
//! the session validator downgrades `MissingCredential` and
//! `InvalidCredential` to a plain "unauthenticated" result, while the
//! session exchange surfaces them as hard errors.

use std::fmt;

/// Failure kinds for identity-token and session-credential handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No identity token or session cookie was supplied.
    MissingCredential,
    /// A supplied credential failed verification (signature, expiry,
    /// or issuer mismatch).
    InvalidCredential { reason: String },
    /// The account's email address has not been verified yet.
    VerificationRequired,
    /// The identity provider is unreachable or misconfigured.
    ServiceUnavailable { reason: String },
    /// A client-to-server call failed before a response was received.
    NetworkFailure { detail: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => {
                write!(f, "no credential supplied")
            }
            Self::InvalidCredential { reason } => {
                write!(f, "invalid credential: {reason}")
            }
            Self::VerificationRequired => {
                write!(
                    f,
                    "email not verified: click the verification link in your inbox, then try again"
                )
            }
            Self::ServiceUnavailable { reason } => {
                write!(f, "identity service unavailable: {reason}")
            }
            Self::NetworkFailure { detail } => {
                write!(f, "network failure before a response was received: {detail}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_display() {
        let err = AuthError::MissingCredential;
        assert!(err.to_string().contains("no credential"));
    }

    #[test]
    fn invalid_credential_display() {
        let err = AuthError::InvalidCredential {
            reason: "signature mismatch".to_string(),
        };
        assert!(err.to_string().contains("invalid credential"));
        assert!(err.to_string().contains("signature mismatch"));
    }

    #[test]
    fn verification_required_is_actionable() {
        let err = AuthError::VerificationRequired;
        assert!(err.to_string().contains("verification link"));
    }

    #[test]
    fn service_unavailable_display() {
        let err = AuthError::ServiceUnavailable {
            reason: "connection timeout".to_string(),
        };
        assert!(err.to_string().contains("unavailable"));
        assert!(err.to_string().contains("connection timeout"));
    }

    #[test]
    fn network_failure_display() {
        let err = AuthError::NetworkFailure {
            detail: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("before a response"));
        assert!(err.to_string().contains("connection refused"));
    }
}
