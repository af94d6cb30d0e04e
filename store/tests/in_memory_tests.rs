//! Tests for the in-memory repositories.
//!
//! These exercise each repository through its trait, the way the booking
//! services use them.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use chrono::{NaiveDate, TimeZone, Utc};
use frontdesk_core::calendar::StayPeriod;
use frontdesk_core::error::StoreError;
use frontdesk_core::repository::{BookingRepository, CatalogRepository, CustomerRepository};
use frontdesk_core::status::{BookingStatus, HoldPolicy};
use frontdesk_core::types::{
    Booking, BookingHistory, BookingId, BookingRoom, Customer, CustomerId, Hotel, HotelId, Money,
    Room, RoomId, RoomStatus, RoomType,
};
use frontdesk_core::smallvec;
use frontdesk_store::{InMemoryBookings, InMemoryCatalog, InMemoryCustomers};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn booking(hotel_id: HotelId, room_id: RoomId, check_in: NaiveDate, check_out: NaiveDate) -> Booking {
    let id = BookingId::new();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    Booking {
        id,
        customer_id: CustomerId::new(),
        hotel_id,
        check_in,
        check_out,
        guests: 2,
        total_cost: Money::new(1_000_000),
        status: BookingStatus::Pending,
        rooms: smallvec![BookingRoom {
            booking_id: id,
            room_id,
            price: Money::new(1_000_000),
        }],
        created_at: now,
        updated_at: now,
    }
}

fn created_row(booking: &Booking) -> BookingHistory {
    BookingHistory::new(
        booking.id,
        None,
        BookingStatus::Pending,
        "front-desk",
        booking.created_at,
        None,
    )
}

#[tokio::test]
async fn test_catalog_rejects_orphans_and_duplicate_numbers() {
    let catalog = InMemoryCatalog::new();
    let hotel = Hotel::new("Riverside", "12 Ton Duc Thang", "Ho Chi Minh City");
    let deluxe = RoomType::new(hotel.id, "Deluxe", 2, Money::new(800_000));

    let orphan = catalog.insert_room_type(deluxe.clone()).await;
    assert!(matches!(orphan, Err(StoreError::Missing(_))));

    catalog.insert_hotel(hotel.clone()).await.unwrap();
    catalog.insert_room_type(deluxe.clone()).await.unwrap();
    catalog.insert_room(Room::new(hotel.id, deluxe.id, "301", 3)).await.unwrap();

    let duplicate = catalog.insert_room(Room::new(hotel.id, deluxe.id, "301", 3)).await;
    assert!(matches!(duplicate, Err(StoreError::Duplicate(_))));
    assert_eq!(catalog.room_count(), 1);
}

#[tokio::test]
async fn test_catalog_lists_rooms_by_number_and_updates_status() {
    let catalog = InMemoryCatalog::new();
    let hotel = Hotel::new("Riverside", "12 Ton Duc Thang", "Ho Chi Minh City");
    let standard = RoomType::new(hotel.id, "Standard", 2, Money::new(500_000));
    catalog.insert_hotel(hotel.clone()).await.unwrap();
    catalog.insert_room_type(standard.clone()).await.unwrap();
    for number in ["203", "1001", "101", "102"] {
        catalog
            .insert_room(Room::new(hotel.id, standard.id, number, 1))
            .await
            .unwrap();
    }

    let rooms = catalog.rooms_for_hotel(hotel.id).await.unwrap();
    let numbers: Vec<_> = rooms.iter().map(|room| room.number.as_str()).collect();
    assert_eq!(numbers, vec!["101", "102", "203", "1001"]);

    let updated = catalog
        .set_room_status(rooms[0].id, RoomStatus::OutOfOrder)
        .await
        .unwrap();
    assert_eq!(updated.status, RoomStatus::OutOfOrder);

    let missing = catalog.set_room_status(RoomId::new(), RoomStatus::Cleaning).await;
    assert!(matches!(missing, Err(StoreError::Missing(_))));
}

#[tokio::test]
async fn test_customer_lookup_by_contact_keys() {
    let customers = InMemoryCustomers::new();
    let customer = Customer {
        id: CustomerId::new(),
        full_name: "Nguyen Van A".to_string(),
        email: Some("a@x.com".to_string()),
        phone: Some("0901234567".to_string()),
        nationality: Some("VN".to_string()),
        created_at: Utc::now(),
    };
    customers.insert(customer.clone()).await.unwrap();

    let by_email = customers.find_by_email("a@x.com".to_string()).await.unwrap();
    let by_phone = customers.find_by_phone("0901234567".to_string()).await.unwrap();
    assert_eq!(by_email.map(|c| c.id), Some(customer.id));
    assert_eq!(by_phone.map(|c| c.id), Some(customer.id));
    assert!(customers.find_by_email("b@x.com".to_string()).await.unwrap().is_none());

    let again = customers.insert(customer).await;
    assert!(matches!(again, Err(StoreError::Duplicate(_))));
    assert_eq!(customers.len(), 1);
}

#[tokio::test]
async fn test_overlapping_uses_half_open_intervals() {
    let bookings = InMemoryBookings::new();
    let hotel_id = HotelId::new();
    let room_id = RoomId::new();
    let existing = booking(hotel_id, room_id, date(2024, 1, 10), date(2024, 1, 12));
    bookings.insert(existing.clone(), created_row(&existing)).await.unwrap();

    let statuses = HoldPolicy::PendingHolds.blocking_statuses();
    let turnover = StayPeriod::new(date(2024, 1, 12), date(2024, 1, 14)).unwrap();
    let clash = StayPeriod::new(date(2024, 1, 11), date(2024, 1, 13)).unwrap();

    assert!(bookings.overlapping(vec![room_id], turnover, statuses).await.unwrap().is_empty());
    let found = bookings.overlapping(vec![room_id], clash, statuses).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, existing.id);

    // Pending does not block under the confirmed-only policy
    let confirmed_only = HoldPolicy::ConfirmedOnly.blocking_statuses();
    assert!(bookings.overlapping(vec![room_id], clash, confirmed_only).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_apply_transition_is_compare_and_set() {
    let bookings = InMemoryBookings::new();
    let existing = booking(HotelId::new(), RoomId::new(), date(2024, 1, 10), date(2024, 1, 12));
    bookings.insert(existing.clone(), created_row(&existing)).await.unwrap();

    let confirm = BookingHistory::new(
        existing.id,
        Some(BookingStatus::Pending),
        BookingStatus::Confirmed,
        "reception",
        Utc::now(),
        None,
    );
    let updated = bookings
        .apply_transition(existing.id, BookingStatus::Pending, confirm)
        .await
        .unwrap();
    assert_eq!(updated.status, BookingStatus::Confirmed);
    assert_eq!(updated.total_cost, existing.total_cost);

    let stale = BookingHistory::new(
        existing.id,
        Some(BookingStatus::Pending),
        BookingStatus::Cancelled,
        "reception",
        Utc::now(),
        None,
    );
    let result = bookings
        .apply_transition(existing.id, BookingStatus::Pending, stale)
        .await;
    assert_eq!(
        result,
        Err(StoreError::StatusMismatch {
            expected: BookingStatus::Pending,
            actual: BookingStatus::Confirmed,
        })
    );

    let history = bookings.history(existing.id).await.unwrap();
    let statuses: Vec<_> = history.iter().map(|row| row.new_status).collect();
    assert_eq!(statuses, vec![BookingStatus::Pending, BookingStatus::Confirmed]);
}
