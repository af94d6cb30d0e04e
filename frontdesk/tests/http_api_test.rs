//! HTTP-level tests for the front desk router.
//!
//! Each test drives the full Axum router in process through `axum-test`,
//! against an in-memory hotel seeded from the shared fixture.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use axum::http::StatusCode;
use axum_test::TestServer;
use frontdesk::FrontDesk;
use frontdesk::server::{AppState, build_router};
use frontdesk_core::status::{BookingStatus, HoldPolicy};
use frontdesk_core::types::{
    Booking, BookingHistory, BookingId, Money, OccupancySnapshot, RevenueSummary, Room, RoomOffer,
};
use frontdesk_testing::{HotelFixture, test_clock};
use serde_json::{Value, json};
use std::sync::Arc;

async fn setup() -> (TestServer, HotelFixture) {
    let desk = FrontDesk::in_memory_with_clock(Arc::new(test_clock()), HoldPolicy::default());
    let fixture = HotelFixture::seed(desk.catalog().as_ref()).await.unwrap();
    let server = TestServer::new(build_router(AppState::new(desk, "night-audit"))).unwrap();
    (server, fixture)
}

fn booking_body(fixture: &HotelFixture, email: &str, rooms: &[&str]) -> Value {
    let room_ids: Vec<String> = rooms
        .iter()
        .map(|number| fixture.room_id(number).to_string())
        .collect();
    json!({
        "customer": { "full_name": "Nguyen Van A", "email": email },
        "hotel_id": fixture.hotel.id.to_string(),
        "check_in": "2024-01-15",
        "check_out": "2024-01-17",
        "room_ids": room_ids,
        "guests": 2,
    })
}

async fn post_booking(server: &TestServer, fixture: &HotelFixture, rooms: &[&str]) -> Booking {
    let response = server
        .post("/api/bookings")
        .json(&booking_body(fixture, "a@x.com", rooms))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Booking>()
}

async fn transition(server: &TestServer, id: BookingId, status: &str) -> axum_test::TestResponse {
    server
        .post(&format!("/api/bookings/{id}/transitions"))
        .json(&json!({ "status": status, "changed_by": "reception" }))
        .await
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = setup().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_availability_and_offers() {
    let (server, fixture) = setup().await;
    let hotel_id = fixture.hotel.id;

    let response = server
        .get(&format!("/api/hotels/{hotel_id}/availability"))
        .add_query_param("check_in", "2024-01-15")
        .add_query_param("check_out", "2024-01-17")
        .add_query_param("guests", 3)
        .await;
    response.assert_status_ok();
    let rooms = response.json::<Vec<Room>>();
    let numbers: Vec<_> = rooms.iter().map(|room| room.number.as_str()).collect();
    assert_eq!(numbers, vec!["301"]);

    let response = server
        .get(&format!("/api/hotels/{hotel_id}/offers"))
        .add_query_param("check_in", "2024-01-15")
        .add_query_param("check_out", "2024-01-17")
        .await;
    response.assert_status_ok();
    let offers = response.json::<Vec<RoomOffer>>();
    assert_eq!(offers.len(), 5);
    let deluxe = offers
        .iter()
        .find(|offer| offer.room.number == "201")
        .unwrap();
    assert_eq!(deluxe.nights, 2);
    assert_eq!(deluxe.total, Money::new(1_600_000));
}

#[tokio::test]
async fn test_inverted_stay_is_unprocessable() {
    let (server, fixture) = setup().await;

    let response = server
        .get(&format!("/api/hotels/{}/availability", fixture.hotel.id))
        .add_query_param("check_in", "2024-01-17")
        .add_query_param("check_out", "2024-01-15")
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_create_and_fetch_booking() {
    let (server, fixture) = setup().await;

    let booking = post_booking(&server, &fixture, &["201"]).await;
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_cost, Money::new(1_600_000));

    let response = server.get(&format!("/api/bookings/{}", booking.id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Booking>(), booking);

    let response = server
        .get(&format!("/api/bookings/{}/history", booking.id))
        .await;
    response.assert_status_ok();
    let history = response.json::<Vec<BookingHistory>>();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_status, None);
    assert_eq!(history[0].new_status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let (server, fixture) = setup().await;
    post_booking(&server, &fixture, &["201"]).await;

    let response = server
        .post("/api/bookings")
        .json(&booking_body(&fixture, "b@x.com", &["201"]))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "ROOM_UNAVAILABLE");
}

#[tokio::test]
async fn test_invalid_booking_is_unprocessable() {
    let (server, fixture) = setup().await;
    let mut body = booking_body(&fixture, "a@x.com", &["201"]);
    body["guests"] = json!(0);

    let response = server.post("/api/bookings").json(&body).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let (server, _) = setup().await;

    let response = server
        .get(&format!("/api/bookings/{}", BookingId::new()))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_transitions_over_http() {
    let (server, fixture) = setup().await;
    let booking = post_booking(&server, &fixture, &["102"]).await;

    for status in ["CONFIRMED", "CHECKED_IN", "CHECKED_OUT"] {
        let response = transition(&server, booking.id, status).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], status);
    }

    // Terminal
    let response = transition(&server, booking.id, "CANCELLED").await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "INVALID_TRANSITION");

    let history = server
        .get(&format!("/api/bookings/{}/history", booking.id))
        .await
        .json::<Vec<BookingHistory>>();
    assert_eq!(history.len(), 4);
    assert!(history[1..].iter().all(|row| row.changed_by == "reception"));
}

#[tokio::test]
async fn test_revenue_and_occupancy_reports() {
    let (server, fixture) = setup().await;
    let hotel_id = fixture.hotel.id;
    let booking = post_booking(&server, &fixture, &["101"]).await;
    transition(&server, booking.id, "CONFIRMED")
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/hotels/{hotel_id}/revenue"))
        .add_query_param("from", "2024-01-01")
        .add_query_param("to", "2024-01-31")
        .await;
    response.assert_status_ok();
    let summary = response.json::<RevenueSummary>();
    assert_eq!(summary.total, Money::new(1_000_000));
    assert_eq!(summary.count, 1);

    let response = server
        .get(&format!("/api/hotels/{hotel_id}/revenue"))
        .add_query_param("from", "2024-02-01")
        .add_query_param("to", "2024-01-01")
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .get(&format!("/api/hotels/{hotel_id}/occupancy"))
        .add_query_param("date", "2024-01-16")
        .await;
    response.assert_status_ok();
    let snapshot = response.json::<OccupancySnapshot>();
    assert_eq!(snapshot.total_rooms, 5);
    assert_eq!(snapshot.occupied_rooms, 1);
}

#[tokio::test]
async fn test_no_show_sweep_uses_configured_actor() {
    let (server, fixture) = setup().await;
    let booking = post_booking(&server, &fixture, &["202"]).await;
    transition(&server, booking.id, "CONFIRMED")
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/hotels/{}/no-shows", fixture.hotel.id))
        .json(&json!({ "as_of": "2024-01-16" }))
        .await;

    response.assert_status_ok();
    let marked = response.json::<Vec<Booking>>();
    assert_eq!(marked.len(), 1);
    assert_eq!(marked[0].status, BookingStatus::NoShow);

    let history = server
        .get(&format!("/api/bookings/{}/history", booking.id))
        .await
        .json::<Vec<BookingHistory>>();
    let last = history.last().unwrap();
    assert_eq!(last.new_status, BookingStatus::NoShow);
    assert_eq!(last.changed_by, "night-audit");
}
