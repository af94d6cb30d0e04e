//! Booking endpoints.
//!
//! - POST /api/bookings - Create a booking
//! - GET /api/bookings/:id - Get a booking
//! - GET /api/bookings/:id/history - Status history
//! - POST /api/bookings/:id/transitions - Change status

use crate::api::ApiError;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use frontdesk_core::status::BookingStatus;
use frontdesk_core::types::{Booking, BookingHistory, BookingId, CreateBookingRequest};
use serde::Deserialize;

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status
    pub status: BookingStatus,
    /// Staff member making the change
    pub changed_by: String,
    /// Optional free-text reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// Create a PENDING booking.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/bookings \
///   -H 'Content-Type: application/json' \
///   -d '{"customer":{"full_name":"Nguyen Van A","email":"a@x.com"},
///        "hotel_id":"<id>","check_in":"2024-01-15","check_out":"2024-01-17",
///        "room_ids":["<room>"],"guests":2}'
/// ```
///
/// # Errors
///
/// 409 if a room was taken, 404 for unknown ids, 422 for invalid input.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = state.front_desk.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a booking by id.
///
/// # Errors
///
/// 404 for an unknown booking.
pub async fn get_booking(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.front_desk.bookings().get_booking(booking_id).await?;
    Ok(Json(booking))
}

/// Status history of a booking, oldest first.
///
/// # Errors
///
/// 404 for an unknown booking.
pub async fn get_history(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingHistory>>, ApiError> {
    let history = state.front_desk.bookings().history(booking_id).await?;
    Ok(Json(history))
}

/// Move a booking to a new status.
///
/// # Errors
///
/// 409 for a transition the state machine forbids, 404 for an unknown booking.
pub async fn transition_booking(
    Path(booking_id): Path<BookingId>,
    State(state): State<AppState>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .front_desk
        .transition_booking(booking_id, request.status, &request.changed_by, request.reason)
        .await?;
    Ok(Json(booking))
}
