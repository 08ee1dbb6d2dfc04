//! Core domain types and utilities for the fitbook platform.
//!
//! This crate provides the foundational types and error handling shared
//! by the fitbook booking application's server and client crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{BookingId, EventId, ParseIdError, TrainerId};
