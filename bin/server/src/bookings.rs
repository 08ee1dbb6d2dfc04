//! In-memory booking store.
//!
//! Bookings live for the lifetime of the process; durable storage is
//! deliberately out of scope. The store is the only process-wide
//! mutable state in the server.

use chrono::{DateTime, Utc};
use fitbook_core::{BookingId, EventId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A confirmed booking for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Process-lifetime booking store.
#[derive(Debug, Clone, Default)]
pub struct BookingStore {
    inner: Arc<RwLock<Vec<Booking>>>,
}

impl BookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new booking and returns it.
    pub async fn add(&self, event_id: EventId, name: String, email: String) -> Booking {
        let booking = Booking {
            id: BookingId::new(),
            event_id,
            name,
            email,
            created_at: Utc::now(),
        };

        self.inner.write().await.push(booking.clone());
        booking
    }

    /// Returns all bookings in creation order.
    pub async fn all(&self) -> Vec<Booking> {
        self.inner.read().await.clone()
    }

    /// Returns the bookings made under the given email address.
    pub async fn for_email(&self, email: &str) -> Vec<Booking> {
        self.inner
            .read()
            .await
            .iter()
            .filter(|b| b.email == email)
            .cloned()
            .collect()
    }
}
