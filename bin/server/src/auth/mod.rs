//! Authentication module for the fitbook server.
//!
//! This module provides:
//! - The session exchange: trading a verified identity token for a
//!   server-trusted session cookie
//! - The session validator: a read endpoint reporting the caller's
//!   authentication state from the session cookie
//! - The access gate: middleware redirecting unauthenticated requests
//!   away from protected paths
//! - The session cookie codec
//!
//! # Trust Model
//!
//! The server never issues its own cryptographic tokens. Both identity
//! tokens and session cookies are verified through the identity
//! provider seam; a session cookie exists only after a successful
//! identity-token verification. Verification is stateless, so no
//! locking or shared session storage is involved.

pub mod cookie;
pub mod gate;
pub mod routes;

use std::sync::Arc;

use fitbook_identity::IdentityProvider;

use crate::bookings::BookingStore;
use crate::catalog::EventCatalog;
use crate::config::SessionConfig;

pub use gate::access_gate;
pub use routes::{me, session_login, session_logout};

/// Shared application state.
pub struct AppState {
    /// Identity provider client; initialized once at startup.
    pub identity: Arc<dyn IdentityProvider>,
    /// Session configuration.
    pub session: SessionConfig,
    /// Read-only event catalog.
    pub catalog: EventCatalog,
    /// In-memory booking store.
    pub bookings: BookingStore,
    /// Development configuration: surface internal fault details.
    pub dev_errors: bool,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        session: SessionConfig,
        catalog: EventCatalog,
        bookings: BookingStore,
        dev_errors: bool,
    ) -> Self {
        Self {
            identity,
            session,
            catalog,
            bookings,
            dev_errors,
        }
    }
}
