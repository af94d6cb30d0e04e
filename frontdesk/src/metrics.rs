//! Business metrics for the front desk.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `frontdesk_bookings_total{status}` - Bookings created, by initial status
//! - `frontdesk_booking_conflicts_total` - Booking attempts rejected because a room was taken
//! - `frontdesk_transitions_total{to}` - Committed status transitions, by target status
//! - `frontdesk_no_shows_total` - Bookings marked as no-show
//! - `frontdesk_booked_value_total` - Committed booking value in VND

use frontdesk_core::status::BookingStatus;
use frontdesk_core::types::Money;
use metrics::describe_counter;

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "frontdesk_bookings_total",
        "Total number of bookings created, by initial status"
    );
    describe_counter!(
        "frontdesk_booking_conflicts_total",
        "Booking attempts rejected because a requested room was already held"
    );
    describe_counter!(
        "frontdesk_transitions_total",
        "Committed booking status transitions, by target status"
    );
    describe_counter!(
        "frontdesk_no_shows_total",
        "Total number of bookings marked as no-show"
    );
    describe_counter!(
        "frontdesk_booked_value_total",
        "Total committed booking value in VND"
    );

    tracing::info!("Business metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a booking created event.
pub fn record_booking_created(status: BookingStatus, total: Money) {
    metrics::counter!("frontdesk_bookings_total", "status" => status.as_str()).increment(1);
    metrics::counter!("frontdesk_booked_value_total").increment(total.amount());
    tracing::debug!(%status, total = total.amount(), "Recorded booking_created metric");
}

/// Record a booking rejected because a room was taken.
pub fn record_booking_conflict() {
    metrics::counter!("frontdesk_booking_conflicts_total").increment(1);
    tracing::debug!("Recorded booking_conflict metric");
}

/// Record a committed status transition.
pub fn record_transition(to: BookingStatus) {
    metrics::counter!("frontdesk_transitions_total", "to" => to.as_str()).increment(1);
    if to == BookingStatus::NoShow {
        metrics::counter!("frontdesk_no_shows_total").increment(1);
    }
    tracing::debug!(%to, "Recorded transition metric");
}
