//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! See [`IdentityConfig`](fitbook_identity::IdentityConfig) for the
//! identity-provider configuration; it is required, and its absence is
//! a fatal error at startup rather than a per-request error.

use fitbook_identity::IdentityConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Development configuration: include internal fault details in
    /// error responses. Keep disabled outside local development.
    #[serde(default)]
    pub dev_errors: bool,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Identity provider configuration.
    pub identity: IdentityConfig,

    /// Event catalog configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session credential lifetime in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Whether to set the Secure flag on the session cookie (requires
    /// HTTPS). Defaults to true for production safety; set to false
    /// only for plain-HTTP local development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Path unauthenticated requests to protected routes are
    /// redirected to.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Protected path prefixes as a comma-separated string.
    /// Paths outside these prefixes bypass the access gate entirely.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_ttl_seconds() -> i64 {
    // 5 days
    60 * 60 * 24 * 5
}

fn default_secure_cookies() -> bool {
    true
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_protected_paths() -> String {
    "/protected".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            secure_cookies: default_secure_cookies(),
            login_path: default_login_path(),
            protected_paths: default_protected_paths(),
        }
    }
}

impl SessionConfig {
    /// Returns the protected path prefixes, parsed from the
    /// comma-separated string.
    #[must_use]
    pub fn protected_prefixes(&self) -> Vec<&str> {
        self.protected_paths
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Returns true if the given request path falls under a protected
    /// prefix.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes()
            .iter()
            .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
    }
}

/// Event catalog configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Path to the event catalog JSON file.
    #[serde(default = "default_events_path")]
    pub events_path: String,
}

fn default_events_path() -> String {
    "data/events.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            events_path: default_events_path(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
