//! Identity-provider integration and session credentials for fitbook.
//!
//! This crate provides:
//! - The [`IdentityProvider`] trait: everything the session-authentication
//!   core consumes from the external identity provider
//! - Decoded claim types ([`IdTokenClaims`], [`AuthenticatedIdentity`])
//! - The authentication error taxonomy ([`AuthError`])
//! - Provider configuration ([`IdentityConfig`])
//! - The production client ([`GoogleIdentity`])
//!
//! # Trust Model
//!
//! The application never issues its own cryptographic tokens. Identity
//! tokens are minted by the provider at login; session credentials are
//! minted by the provider from a verified identity token and verified
//! locally against the provider's published signing keys. A session
//! credential is accepted only if it verifies against the issuing
//! authority and has not expired.

pub mod claims;
pub mod config;
pub mod error;
pub mod google;
pub mod provider;

// Re-export main types at crate root
pub use claims::{AuthenticatedIdentity, IdTokenClaims, peek_payload, peek_sign_in_provider};
pub use config::IdentityConfig;
pub use error::AuthError;
pub use google::GoogleIdentity;
pub use provider::IdentityProvider;
