//! Application router assembly.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::api;

/// Builds the application router.
///
/// The access gate wraps every route; paths outside the configured
/// protected prefixes pass through it untouched.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Session authentication
        .route("/api/session/login", post(auth::session_login))
        .route("/api/session/logout", post(auth::session_logout))
        .route("/api/me", get(auth::me))
        // Catalog and bookings
        .route("/api/events", get(api::list_events))
        .route(
            "/api/bookings",
            get(api::list_bookings).post(api::create_booking),
        )
        .route("/protected/bookings", get(api::my_bookings))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::access_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
