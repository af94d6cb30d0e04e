//! Router configuration for the front desk.

use super::health::health_check;
use super::state::AppState;
use crate::api::{availability, bookings, reports};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// - `/health` liveness check
/// - `/api/hotels/:id/...` availability, offers, revenue, occupancy, no-show sweep
/// - `/api/bookings/...` booking creation, lookup, history and transitions
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Availability (read only)
        .route("/hotels/:id/availability", get(availability::get_availability))
        .route("/hotels/:id/offers", get(availability::get_offers))
        // Reporting
        .route("/hotels/:id/revenue", get(reports::get_revenue))
        .route("/hotels/:id/occupancy", get(reports::get_occupancy))
        .route("/hotels/:id/no-shows", post(reports::sweep_no_shows))
        // Booking lifecycle
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/history", get(bookings::get_history))
        .route("/bookings/:id/transitions", post(bookings::transition_booking));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
