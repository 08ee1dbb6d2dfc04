//! Client-side session state and login flows for fitbook.
//!
//! This crate is the headless client half of the session-authentication
//! flow:
//! - [`AuthClient`]: account operations against the identity provider
//!   (sign-up with verification email, password sign-in, federated
//!   sign-in, reload, token refresh, sign-out)
//! - [`finalize_login`] / [`sign_out_fully`]: the flows that keep the
//!   provider-held client session and the server-held session cookie
//!   consistent with each other
//! - [`SessionState`]: a cache-with-invalidation cell over the server's
//!   session-status endpoint, for UI layers to subscribe to
//!
//! UI concerns (rendering, navigation) live with the embedding
//! application; this crate only exposes the state they observe.

pub mod auth_client;
pub mod exchange;
pub mod finalize;
pub mod session_state;
pub mod token_source;

// Re-export main types at crate root
pub use auth_client::{AuthClient, AuthClientConfig};
pub use exchange::SessionExchange;
pub use finalize::{finalize_login, sign_out_fully};
pub use session_state::{SessionSnapshot, SessionState};
pub use token_source::{TokenSource, UserSnapshot};
