//! The identity-token source seam.
//!
//! Login flows consume the provider-held client session through
//! [`TokenSource`] so that flows can be exercised against stubs. The
//! production implementation is [`crate::AuthClient`].

use async_trait::async_trait;
use fitbook_identity::AuthError;

/// Snapshot of the provider-held user state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    /// Unique user identifier assigned by the provider.
    pub uid: String,
    /// Email address, if the account has one.
    pub email: Option<String>,
    /// Whether the account's email address has been verified.
    pub email_verified: bool,
    /// Whether the account signed in through a federated provider.
    pub federated: bool,
}

/// A client-held source of identity tokens.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Refreshes the provider-held user state (e.g. the email-verified
    /// flag after an out-of-band confirmation) and returns it, or
    /// `None` when nobody is signed in.
    async fn reload(&self) -> Result<Option<UserSnapshot>, AuthError>;

    /// Returns an identity token for the signed-in user, minting a
    /// fresh one when `force_refresh` is set.
    async fn id_token(&self, force_refresh: bool) -> Result<String, AuthError>;

    /// Terminates the provider-held client session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
