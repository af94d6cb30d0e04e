//! HTTP API handlers.
//!
//! Thin adapters from JSON requests to [`crate::FrontDesk`] operations.

pub mod availability;
pub mod bookings;
pub mod error;
pub mod reports;

pub use error::ApiError;
