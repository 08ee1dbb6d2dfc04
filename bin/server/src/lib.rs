//! fitbook web server.
//!
//! This crate provides the HTTP surface of the fitbook booking
//! application: the session-authentication endpoints and access gate,
//! plus the event catalog and booking handlers they protect.

pub mod api;
pub mod app;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod config;
pub mod error;
