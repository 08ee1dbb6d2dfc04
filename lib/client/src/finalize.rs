//! Login finalization and full logout.
//!
//! Finalizing a login turns a provider-held identity into a server
//! session: reload the user state, enforce the email-verification gate,
//! fetch a fresh identity token, and exchange it for a session cookie.
//! Federated login flows pass `require_email_verified = false`;
//! federated providers are trusted to have verified the email already.

use fitbook_identity::AuthError;

use crate::exchange::SessionExchange;
use crate::token_source::TokenSource;

/// Exchanges the signed-in user's identity token for a session cookie.
///
/// # Errors
///
/// - `MissingCredential` when nobody is signed in
/// - `VerificationRequired` when the email-verification gate is enforced
///   and the reloaded state still shows an unverified email; no exchange
///   call is made in that case
/// - errors from the token source or the exchange endpoint otherwise
pub async fn finalize_login(
    source: &dyn TokenSource,
    exchange: &SessionExchange,
    require_email_verified: bool,
) -> Result<(), AuthError> {
    let snapshot = source
        .reload()
        .await?
        .ok_or(AuthError::MissingCredential)?;

    if require_email_verified && !snapshot.email_verified {
        return Err(AuthError::VerificationRequired);
    }

    let id_token = source.id_token(true).await?;
    exchange.establish(&id_token).await
}

/// Logs out everywhere: clears the server-held session cookie AND
/// terminates the provider-held client session.
///
/// Both clears are attempted even when the first fails; a half
/// logged-out state (cookie cleared but provider session alive, or the
/// reverse) is worse than a reported error.
pub async fn sign_out_fully(
    source: &dyn TokenSource,
    exchange: &SessionExchange,
) -> Result<(), AuthError> {
    let server_result = exchange.clear().await;
    let provider_result = source.sign_out().await;

    server_result?;
    provider_result
}
