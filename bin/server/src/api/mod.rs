//! HTTP handlers for the event catalog and bookings.

use axum::extract::{Extension, State};
use axum::{Json, response::IntoResponse};
use fitbook_core::EventId;
use fitbook_identity::AuthenticatedIdentity;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::AppState;
use crate::bookings::Booking;
use crate::catalog::Event;
use crate::error::ApiError;

/// Lists the event catalog.
pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<Event>> {
    Json(state.catalog.events().to_vec())
}

/// Request body for creating a booking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Creates a booking.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.event_id.is_empty() || body.name.is_empty() || body.email.is_empty() {
        return Err(ApiError::MissingFields);
    }

    let booking = state
        .bookings
        .add(EventId::from(body.event_id), body.name, body.email)
        .await;

    Ok(Json(
        serde_json::json!({"success": true, "booking": booking}),
    ))
}

/// Lists all bookings.
pub async fn list_bookings(State(state): State<Arc<AppState>>) -> Json<Vec<Booking>> {
    Json(state.bookings.all().await)
}

/// Lists the authenticated caller's bookings.
///
/// Lives behind the access gate; the identity arrives as a request
/// extension attached by the gate.
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Json<Vec<Booking>> {
    let Some(email) = identity.email else {
        return Json(Vec::new());
    };

    Json(state.bookings.for_email(&email).await)
}
