//! Identity provider client backed by Google's identity toolkit.
//!
//! Identity tokens and session cookies are verified locally against the
//! provider's published JWK sets; session cookies are minted through the
//! provider's REST endpoint, authenticated with a service-account OAuth
//! token obtained via the JWT-bearer grant.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::claims::{AuthenticatedIdentity, IdTokenClaims};
use crate::config::IdentityConfig;
use crate::error::AuthError;
use crate::provider::IdentityProvider;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const IDENTITY_TOOLKIT_SCOPE: &str = "https://www.googleapis.com/auth/identitytoolkit";

/// Leeway before expiry at which a cached access token is re-minted.
const ACCESS_TOKEN_LEEWAY_SECS: i64 = 60;

/// Identity provider client.
///
/// Initialized once at process start from required configuration and
/// read-only thereafter; the internal key and access-token caches are
/// refreshed on miss or expiry.
pub struct GoogleIdentity {
    http: reqwest::Client,
    config: IdentityConfig,
    signer: EncodingKey,
    id_token_keys: KeyCache,
    session_keys: KeyCache,
    access_token: RwLock<Option<CachedAccessToken>>,
}

struct CachedAccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl GoogleIdentity {
    /// Creates a new client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServiceUnavailable` when the service-account private key
    /// cannot be parsed; callers treat this as fatal at startup.
    pub fn new(config: IdentityConfig) -> Result<Self, AuthError> {
        let signer = EncodingKey::from_rsa_pem(config.private_key().as_bytes()).map_err(|e| {
            AuthError::ServiceUnavailable {
                reason: format!("invalid service-account private key: {e}"),
            }
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            id_token_keys: KeyCache::new(config.id_token_keys_url().to_string()),
            session_keys: KeyCache::new(config.session_keys_url().to_string()),
            access_token: RwLock::new(None),
            signer,
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Returns a service-account access token, minting one when the
    /// cached token is absent or close to expiry.
    async fn access_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.access_token.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.expires_at > Utc::now() + Duration::seconds(ACCESS_TOKEN_LEEWAY_SECS) {
                    return Ok(entry.token.clone());
                }
            }
        }

        let now = Utc::now();
        let assertion = ServiceAssertion {
            iss: self.config.client_email().to_string(),
            sub: self.config.client_email().to_string(),
            aud: self.config.token_uri().to_string(),
            scope: IDENTITY_TOOLKIT_SCOPE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let jwt = encode(&Header::new(Algorithm::RS256), &assertion, &self.signer).map_err(
            |e| AuthError::ServiceUnavailable {
                reason: format!("failed to sign service assertion: {e}"),
            },
        )?;

        let response = self
            .http
            .post(self.config.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", jwt.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable {
                reason: format!("token endpoint unreachable: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(AuthError::ServiceUnavailable {
                reason: format!("token endpoint returned {}", response.status()),
            });
        }

        let body: AccessTokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::ServiceUnavailable {
                    reason: format!("unparsable token endpoint response: {e}"),
                })?;

        let mut cached = self.access_token.write().await;
        *cached = Some(CachedAccessToken {
            token: body.access_token.clone(),
            expires_at: now + Duration::seconds(body.expires_in),
        });

        Ok(body.access_token)
    }

    /// Verifies a signed token against a key set, issuer, and the
    /// project audience.
    async fn verify_signed(
        &self,
        token: &str,
        keys: &KeyCache,
        issuer: &str,
    ) -> Result<RawClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let header = decode_header(token).map_err(|e| AuthError::InvalidCredential {
            reason: format!("malformed token: {e}"),
        })?;
        let kid = header.kid.ok_or_else(|| AuthError::InvalidCredential {
            reason: "token header missing key id".to_string(),
        })?;

        let key = keys.key_for(&self.http, &kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.project_id()]);
        validation.set_issuer(&[issuer]);

        let data = decode::<RawClaims>(token, &key, &validation).map_err(map_verification_error)?;
        Ok(data.claims)
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentity {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, AuthError> {
        let issuer = self.config.id_token_issuer();
        let claims = self
            .verify_signed(id_token, &self.id_token_keys, &issuer)
            .await?;

        Ok(IdTokenClaims {
            uid: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
            sign_in_provider: claims.firebase.and_then(|f| f.sign_in_provider),
        })
    }

    async fn create_session_cookie(
        &self,
        id_token: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        if id_token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let access_token = self.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}:createSessionCookie",
            self.config.identitytoolkit_url(),
            self.config.project_id()
        );

        let request = CreateSessionCookieRequest {
            id_token: id_token.to_string(),
            valid_duration: ttl.num_seconds().to_string(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable {
                reason: format!("identity provider unreachable: {e}"),
            })?;

        let status = response.status();
        if status.is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthError::InvalidCredential {
                reason: format!("session cookie request rejected: {detail}"),
            });
        }
        if !status.is_success() {
            return Err(AuthError::ServiceUnavailable {
                reason: format!("session cookie endpoint returned {status}"),
            });
        }

        let body: CreateSessionCookieResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::ServiceUnavailable {
                    reason: format!("unparsable session cookie response: {e}"),
                })?;

        Ok(body.session_cookie)
    }

    async fn verify_session_cookie(
        &self,
        cookie: &str,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let issuer = self.config.session_issuer();
        let claims = self
            .verify_signed(cookie, &self.session_keys, &issuer)
            .await?;

        Ok(AuthenticatedIdentity {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

/// JWK set cache for one of the provider's key endpoints.
///
/// Keys rotate rarely; the set is fetched lazily and refreshed once per
/// lookup when the requested key id is absent.
struct KeyCache {
    url: String,
    keys: RwLock<Option<JwkSet>>,
}

impl KeyCache {
    fn new(url: String) -> Self {
        Self {
            url,
            keys: RwLock::new(None),
        }
    }

    async fn key_for(&self, http: &reqwest::Client, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.lookup(kid).await? {
            return Ok(key);
        }

        self.refresh(http).await?;

        match self.lookup(kid).await? {
            Some(key) => Ok(key),
            None => Err(AuthError::InvalidCredential {
                reason: format!("unknown signing key id '{kid}'"),
            }),
        }
    }

    async fn lookup(&self, kid: &str) -> Result<Option<DecodingKey>, AuthError> {
        let keys = self.keys.read().await;
        let Some(set) = keys.as_ref() else {
            return Ok(None);
        };

        match set.find(kid) {
            Some(jwk) => DecodingKey::from_jwk(jwk).map(Some).map_err(|e| {
                AuthError::ServiceUnavailable {
                    reason: format!("unusable signing key '{kid}': {e}"),
                }
            }),
            None => Ok(None),
        }
    }

    async fn refresh(&self, http: &reqwest::Client) -> Result<(), AuthError> {
        tracing::debug!(url = %self.url, "refreshing provider signing keys");

        let response = http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable {
                reason: format!("failed to fetch signing keys: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(AuthError::ServiceUnavailable {
                reason: format!("signing key endpoint returned {}", response.status()),
            });
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::ServiceUnavailable {
                reason: format!("unparsable signing key set: {e}"),
            })?;

        let mut keys = self.keys.write().await;
        *keys = Some(set);
        Ok(())
    }
}

fn map_verification_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    let reason = match err.kind() {
        ErrorKind::ExpiredSignature => "token has expired".to_string(),
        ErrorKind::ImmatureSignature => "token is not yet valid".to_string(),
        ErrorKind::InvalidIssuer => "token issuer mismatch".to_string(),
        ErrorKind::InvalidAudience => "token audience mismatch".to_string(),
        ErrorKind::InvalidSignature => "token signature is invalid".to_string(),
        other => format!("token verification failed: {other:?}"),
    };

    AuthError::InvalidCredential { reason }
}

/// Service-account assertion for the JWT-bearer grant.
#[derive(Debug, Serialize)]
struct ServiceAssertion {
    iss: String,
    sub: String,
    aud: String,
    scope: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionCookieRequest {
    id_token: String,
    valid_duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionCookieResponse {
    session_cookie: String,
}

/// Token claims as issued by the provider.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    firebase: Option<ProviderInfo>,
}

#[derive(Debug, Deserialize)]
struct ProviderInfo {
    sign_in_provider: Option<String>,
}
