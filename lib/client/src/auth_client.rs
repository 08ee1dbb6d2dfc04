//! REST client for the identity provider's account endpoints.
//!
//! Covers the client half of the authentication flow: signing users up
//! (with a verification email), signing them in with a password or a
//! federated provider token, reloading user state, and minting fresh
//! identity tokens from the refresh token.

use async_trait::async_trait;
use fitbook_identity::{AuthError, claims};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::token_source::{TokenSource, UserSnapshot};

/// Configuration for the account-endpoint client.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthClientConfig {
    /// Browser API key identifying the provider project.
    api_key: String,
    /// Base URL of the account endpoints.
    #[serde(default = "default_accounts_url")]
    accounts_url: String,
    /// Base URL of the token-refresh endpoint.
    #[serde(default = "default_secure_token_url")]
    secure_token_url: String,
}

fn default_accounts_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_secure_token_url() -> String {
    "https://securetoken.googleapis.com".to_string()
}

impl AuthClientConfig {
    /// Creates a configuration with default endpoint URLs.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            accounts_url: default_accounts_url(),
            secure_token_url: default_secure_token_url(),
        }
    }

    /// Overrides the endpoint base URLs (e.g. for an emulator).
    #[must_use]
    pub fn with_endpoints(mut self, accounts_url: String, secure_token_url: String) -> Self {
        self.accounts_url = accounts_url;
        self.secure_token_url = secure_token_url;
        self
    }
}

/// Provider-held client session.
#[derive(Debug, Clone)]
struct ProviderSession {
    uid: String,
    email: Option<String>,
    email_verified: bool,
    federated: bool,
    id_token: String,
    refresh_token: Option<String>,
}

impl ProviderSession {
    fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            uid: self.uid.clone(),
            email: self.email.clone(),
            email_verified: self.email_verified,
            federated: self.federated,
        }
    }
}

/// Client for the identity provider's account endpoints.
///
/// Holds at most one signed-in user at a time, mirroring a browser's
/// provider session.
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthClientConfig,
    session: RwLock<Option<ProviderSession>>,
}

impl AuthClient {
    /// Creates a new client.
    #[must_use]
    pub fn new(http: reqwest::Client, config: AuthClientConfig) -> Self {
        Self {
            http,
            config,
            session: RwLock::new(None),
        }
    }

    /// Returns the current user state without contacting the provider.
    pub async fn current_user(&self) -> Option<UserSnapshot> {
        self.session.read().await.as_ref().map(ProviderSession::snapshot)
    }

    /// Signs up a new email/password account and sends a verification
    /// email. The account starts with an unverified email address.
    pub async fn sign_up_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserSnapshot, AuthError> {
        let response: SignInResponse = self
            .post_account(
                "accounts:signUp",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let session = ProviderSession {
            uid: response.local_id,
            email: response.email.or_else(|| Some(email.to_string())),
            email_verified: false,
            federated: false,
            id_token: response.id_token.clone(),
            refresh_token: response.refresh_token,
        };
        let snapshot = session.snapshot();
        *self.session.write().await = Some(session);

        // Verification email required before the session can be finalized
        self.post_account::<serde_json::Value>(
            "accounts:sendOobCode",
            &serde_json::json!({
                "requestType": "VERIFY_EMAIL",
                "idToken": response.id_token,
            }),
        )
        .await?;

        Ok(snapshot)
    }

    /// Signs in an existing email/password account.
    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserSnapshot, AuthError> {
        let response: SignInResponse = self
            .post_account(
                "accounts:signInWithPassword",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        *self.session.write().await = Some(ProviderSession {
            uid: response.local_id,
            email: response.email.or_else(|| Some(email.to_string())),
            email_verified: false,
            federated: false,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        });

        // Lookup fills in the verified flag the sign-in response omits
        match self.reload().await? {
            Some(snapshot) => Ok(snapshot),
            None => Err(AuthError::MissingCredential),
        }
    }

    /// Signs in with a federated provider credential (e.g. a Google ID
    /// token obtained from a popup flow).
    pub async fn sign_in_federated(
        &self,
        provider_id: &str,
        provider_token: &str,
    ) -> Result<UserSnapshot, AuthError> {
        let response: SignInResponse = self
            .post_account(
                "accounts:signInWithIdp",
                &serde_json::json!({
                    "requestUri": "http://localhost",
                    "postBody": format!("id_token={provider_token}&providerId={provider_id}"),
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let federated = claims::peek_sign_in_provider(&response.id_token)
            .map_or(true, |p| p != claims::PASSWORD_PROVIDER);

        let session = ProviderSession {
            uid: response.local_id,
            email: response.email,
            email_verified: response.email_verified,
            federated,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        };
        let snapshot = session.snapshot();
        *self.session.write().await = Some(session);

        Ok(snapshot)
    }

    async fn post_account<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AuthError> {
        let url = format!(
            "{}/v1/{}?key={}",
            self.config.accounts_url, endpoint, self.config.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure {
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        response.json().await.map_err(|e| AuthError::ServiceUnavailable {
            reason: format!("unparsable provider response: {e}"),
        })
    }
}

#[async_trait]
impl TokenSource for AuthClient {
    async fn reload(&self) -> Result<Option<UserSnapshot>, AuthError> {
        let id_token = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(s) => s.id_token.clone(),
                None => return Ok(None),
            }
        };

        let response: LookupResponse = self
            .post_account("accounts:lookup", &serde_json::json!({"idToken": id_token}))
            .await?;

        let Some(user) = response.users.into_iter().next() else {
            // Provider no longer knows the account; drop the stale session
            *self.session.write().await = None;
            return Ok(None);
        };

        let mut session = self.session.write().await;
        if let Some(s) = session.as_mut() {
            s.uid = user.local_id;
            s.email = user.email.or(s.email.take());
            s.email_verified = user.email_verified;
            return Ok(Some(s.snapshot()));
        }
        Ok(None)
    }

    async fn id_token(&self, force_refresh: bool) -> Result<String, AuthError> {
        let (id_token, refresh_token) = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(s) => (s.id_token.clone(), s.refresh_token.clone()),
                None => return Err(AuthError::MissingCredential),
            }
        };

        if !force_refresh {
            return Ok(id_token);
        }

        let Some(refresh_token) = refresh_token else {
            // No refresh token to trade in; the held token is the best we have
            return Ok(id_token);
        };

        let url = format!(
            "{}/v1/token?key={}",
            self.config.secure_token_url, self.config.api_key
        );

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure {
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let body: RefreshResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::ServiceUnavailable {
                    reason: format!("unparsable token refresh response: {e}"),
                })?;

        let mut session = self.session.write().await;
        if let Some(s) = session.as_mut() {
            s.id_token = body.id_token.clone();
            s.refresh_token = Some(body.refresh_token);
        }

        Ok(body.id_token)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().await = None;
        Ok(())
    }
}

/// Maps a non-success provider response to an error kind.
async fn provider_error(response: reqwest::Response) -> AuthError {
    let status = response.status();
    let message = response
        .json::<ProviderErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error.map(|e| e.message))
        .unwrap_or_else(|| status.to_string());

    if status.is_server_error() {
        AuthError::ServiceUnavailable { reason: message }
    } else {
        AuthError::InvalidCredential { reason: message }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: Option<String>,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}
