//! The identity-provider seam.
//!
//! Everything the session-authentication core needs from an identity
//! provider is expressed by [`IdentityProvider`]. The production
//! implementation is [`crate::GoogleIdentity`]; tests substitute stubs.

use async_trait::async_trait;
use chrono::Duration;

use crate::claims::{AuthenticatedIdentity, IdTokenClaims};
use crate::error::AuthError;

/// Capabilities consumed from the external identity provider.
///
/// All operations are stateless from the caller's perspective:
/// verifying the same credential twice yields the same result unless it
/// has expired or been revoked in between.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a short-lived identity token issued at login time.
    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, AuthError>;

    /// Mints a session credential from a verified identity token.
    ///
    /// The credential is bound to the token's identity and expires
    /// after `ttl`. No credential exists without a prior successful
    /// identity-token verification.
    async fn create_session_cookie(
        &self,
        id_token: &str,
        ttl: Duration,
    ) -> Result<String, AuthError>;

    /// Verifies a session credential and returns the identity it
    /// establishes.
    async fn verify_session_cookie(
        &self,
        cookie: &str,
    ) -> Result<AuthenticatedIdentity, AuthError>;
}
