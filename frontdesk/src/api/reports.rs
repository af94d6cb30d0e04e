//! Reporting and night-audit endpoints.
//!
//! - GET /api/hotels/:id/revenue - Revenue over a check-in date range
//! - GET /api/hotels/:id/occupancy - Room usage on one night
//! - POST /api/hotels/:id/no-shows - Mark overdue confirmed bookings as no-show

use crate::api::ApiError;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use frontdesk_core::types::{Booking, HotelId, OccupancySnapshot, RevenueSummary};
use serde::Deserialize;

/// Query string for revenue reports.
#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// First check-in date counted (inclusive)
    pub from: NaiveDate,
    /// Last check-in date counted (inclusive)
    pub to: NaiveDate,
}

/// Query string for occupancy snapshots.
#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    /// The night to describe
    pub date: NaiveDate,
}

/// Request body for a no-show sweep.
#[derive(Debug, Deserialize)]
pub struct NoShowSweepRequest {
    /// Bookings checking in before this date are overdue
    pub as_of: NaiveDate,
}

/// Revenue of bookings checking in within `[from, to]`.
///
/// # Errors
///
/// 422 if `from > to`, 404 for an unknown hotel.
pub async fn get_revenue(
    Path(hotel_id): Path<HotelId>,
    Query(query): Query<RevenueQuery>,
    State(state): State<AppState>,
) -> Result<Json<RevenueSummary>, ApiError> {
    let summary = state
        .front_desk
        .get_revenue(hotel_id, query.from, query.to)
        .await?;
    Ok(Json(summary))
}

/// Room usage on one night.
///
/// # Errors
///
/// 404 for an unknown hotel.
pub async fn get_occupancy(
    Path(hotel_id): Path<HotelId>,
    Query(query): Query<OccupancyQuery>,
    State(state): State<AppState>,
) -> Result<Json<OccupancySnapshot>, ApiError> {
    let snapshot = state
        .front_desk
        .revenue()
        .occupancy(hotel_id, query.date)
        .await?;
    Ok(Json(snapshot))
}

/// Mark overdue confirmed bookings as no-show, returning them.
///
/// # Errors
///
/// 404 for an unknown hotel.
pub async fn sweep_no_shows(
    Path(hotel_id): Path<HotelId>,
    State(state): State<AppState>,
    Json(request): Json<NoShowSweepRequest>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let marked = state
        .front_desk
        .bookings()
        .sweep_no_shows(hotel_id, request.as_of, &state.no_show_actor)
        .await?;
    Ok(Json(marked))
}
