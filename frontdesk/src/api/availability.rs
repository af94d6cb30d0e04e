//! Room availability endpoints.
//!
//! - GET /api/hotels/:id/availability - Rooms free for a stay
//! - GET /api/hotels/:id/offers - The same rooms, priced

use crate::api::ApiError;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use frontdesk_core::types::{HotelId, Room, RoomOffer};
use serde::Deserialize;

/// Query string for availability searches.
#[derive(Debug, Deserialize)]
pub struct StayQuery {
    /// First night (ISO-8601 date)
    pub check_in: NaiveDate,
    /// Departure date (ISO-8601 date)
    pub check_out: NaiveDate,
    /// Party size, defaults to 1
    #[serde(default = "one_guest")]
    pub guests: u32,
}

const fn one_guest() -> u32 {
    1
}

/// List rooms that can host the party for the stay.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:8080/api/hotels/<id>/availability?check_in=2024-01-15&check_out=2024-01-17&guests=2'
/// ```
///
/// # Errors
///
/// 422 for a bad stay or zero guests.
pub async fn get_availability(
    Path(hotel_id): Path<HotelId>,
    Query(query): Query<StayQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let rooms = state
        .front_desk
        .search_availability(hotel_id, query.check_in, query.check_out, query.guests)
        .await?;
    Ok(Json(rooms))
}

/// List available rooms with their room type and stay price.
///
/// # Errors
///
/// 404 for an unknown hotel, 422 for a bad stay or zero guests.
pub async fn get_offers(
    Path(hotel_id): Path<HotelId>,
    Query(query): Query<StayQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomOffer>>, ApiError> {
    let offers = state
        .front_desk
        .availability()
        .quote(hotel_id, query.check_in, query.check_out, query.guests)
        .await?;
    Ok(Json(offers))
}
