//! Shared test support: a deterministic stub identity provider.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fitbook_identity::{AuthError, AuthenticatedIdentity, IdTokenClaims, IdentityProvider};
use fitbook_server::auth::AppState;
use fitbook_server::bookings::BookingStore;
use fitbook_server::catalog::EventCatalog;
use fitbook_server::config::SessionConfig;
use std::collections::HashMap;
use std::sync::Arc;

pub struct StubUser {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub sign_in_provider: Option<String>,
}

/// Identity provider stub mapping known identity tokens to users and
/// minting parsable session cookies of the form
/// `sess|<uid>|<email>|<expiry unix timestamp>`.
pub struct StubIdentity {
    tokens: HashMap<String, StubUser>,
    pub fail_mint: bool,
}

impl StubIdentity {
    pub fn new() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(
            "tok-alice".to_string(),
            StubUser {
                uid: "alice-uid".to_string(),
                email: Some("alice@example.com".to_string()),
                email_verified: true,
                sign_in_provider: Some("password".to_string()),
            },
        );
        tokens.insert(
            "tok-bob".to_string(),
            StubUser {
                uid: "bob-uid".to_string(),
                email: Some("bob@example.com".to_string()),
                email_verified: false,
                sign_in_provider: Some("google.com".to_string()),
            },
        );
        Self {
            tokens,
            fail_mint: false,
        }
    }

    pub fn failing_mint() -> Self {
        let mut stub = Self::new();
        stub.fail_mint = true;
        stub
    }

    /// Builds a session cookie the stub's verifier accepts (or rejects,
    /// when `expires_at` lies in the past).
    pub fn session_cookie(uid: &str, email: Option<&str>, expires_at: DateTime<Utc>) -> String {
        format!(
            "sess|{uid}|{}|{}",
            email.unwrap_or_default(),
            expires_at.timestamp()
        )
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, AuthError> {
        if id_token.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        match self.tokens.get(id_token) {
            Some(user) => Ok(IdTokenClaims {
                uid: user.uid.clone(),
                email: user.email.clone(),
                email_verified: user.email_verified,
                sign_in_provider: user.sign_in_provider.clone(),
            }),
            None => Err(AuthError::InvalidCredential {
                reason: "unknown identity token".to_string(),
            }),
        }
    }

    async fn create_session_cookie(
        &self,
        id_token: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        if self.fail_mint {
            return Err(AuthError::ServiceUnavailable {
                reason: "mint disabled".to_string(),
            });
        }
        let claims = self.verify_id_token(id_token).await?;
        Ok(Self::session_cookie(
            &claims.uid,
            claims.email.as_deref(),
            Utc::now() + ttl,
        ))
    }

    async fn verify_session_cookie(
        &self,
        cookie: &str,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        if cookie.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        let parts: Vec<&str> = cookie.split('|').collect();
        let ["sess", uid, email, expires] = parts.as_slice() else {
            return Err(AuthError::InvalidCredential {
                reason: "malformed session cookie".to_string(),
            });
        };
        let expires: i64 = expires.parse().map_err(|_| AuthError::InvalidCredential {
            reason: "malformed session cookie expiry".to_string(),
        })?;
        if expires <= Utc::now().timestamp() {
            return Err(AuthError::InvalidCredential {
                reason: "session cookie has expired".to_string(),
            });
        }
        Ok(AuthenticatedIdentity {
            uid: (*uid).to_string(),
            email: (!email.is_empty()).then(|| (*email).to_string()),
        })
    }
}

pub fn test_state(identity: StubIdentity) -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(identity),
        SessionConfig::default(),
        EventCatalog::fallback(),
        BookingStore::new(),
        false,
    ))
}

pub fn test_state_with(identity: StubIdentity, session: SessionConfig, dev_errors: bool) -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(identity),
        session,
        EventCatalog::fallback(),
        BookingStore::new(),
        dev_errors,
    ))
}
