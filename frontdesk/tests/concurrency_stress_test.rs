//! Concurrency stress tests for last-room scenarios.
//!
//! These tests verify that under concurrent load the engine never
//! double-books a room, never duplicates a customer, and commits exactly one
//! of several racing transitions.
//!
//! Run with: `cargo test --test concurrency_stress_test -- --nocapture`

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use frontdesk::FrontDesk;
use frontdesk_core::calendar::StayPeriod;
use frontdesk_core::error::BookingError;
use frontdesk_core::repository::{BookingRepository, BoxFuture, CatalogRepository, StoreResult};
use frontdesk_core::status::{BookingStatus, HoldPolicy};
use frontdesk_core::types::{
    Booking, BookingHistory, BookingId, CreateBookingRequest, CustomerId, CustomerInfo, Hotel,
    HotelId, Room, RoomId, RoomStatus, RoomType, RoomTypeId,
};
use frontdesk_store::{InMemoryBookings, InMemoryCatalog, InMemoryCustomers};
use frontdesk_testing::{HotelFixture, date, guest, test_clock};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

async fn setup() -> (FrontDesk, HotelFixture) {
    let desk = FrontDesk::in_memory_with_clock(Arc::new(test_clock()), HoldPolicy::default());
    let fixture = HotelFixture::seed(desk.catalog().as_ref()).await.unwrap();
    (desk, fixture)
}

/// Ordered record of committed writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Write {
    Status(BookingStatus),
    Room(RoomStatus),
}

#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<Write>>>);

impl Journal {
    fn push(&self, write: Write) {
        self.0.lock().unwrap().push(write);
    }

    fn take(&self) -> Vec<Write> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Catalog that journals room status writes and yields before each one.
struct JournalingCatalog {
    inner: InMemoryCatalog,
    journal: Journal,
}

impl CatalogRepository for JournalingCatalog {
    fn hotel(&self, id: HotelId) -> BoxFuture<'_, StoreResult<Option<Hotel>>> {
        self.inner.hotel(id)
    }

    fn room_type(&self, id: RoomTypeId) -> BoxFuture<'_, StoreResult<Option<RoomType>>> {
        self.inner.room_type(id)
    }

    fn room_types_for_hotel(
        &self,
        hotel_id: HotelId,
    ) -> BoxFuture<'_, StoreResult<Vec<RoomType>>> {
        self.inner.room_types_for_hotel(hotel_id)
    }

    fn room(&self, id: RoomId) -> BoxFuture<'_, StoreResult<Option<Room>>> {
        self.inner.room(id)
    }

    fn rooms_for_hotel(&self, hotel_id: HotelId) -> BoxFuture<'_, StoreResult<Vec<Room>>> {
        self.inner.rooms_for_hotel(hotel_id)
    }

    fn set_room_status(
        &self,
        id: RoomId,
        status: RoomStatus,
    ) -> BoxFuture<'_, StoreResult<Room>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let room = self.inner.set_room_status(id, status).await?;
            self.journal.push(Write::Room(status));
            Ok(room)
        })
    }

    fn insert_hotel(&self, hotel: Hotel) -> BoxFuture<'_, StoreResult<()>> {
        self.inner.insert_hotel(hotel)
    }

    fn insert_room_type(&self, room_type: RoomType) -> BoxFuture<'_, StoreResult<()>> {
        self.inner.insert_room_type(room_type)
    }

    fn insert_room(&self, room: Room) -> BoxFuture<'_, StoreResult<()>> {
        self.inner.insert_room(room)
    }
}

/// Booking store that journals committed transitions and yields after each.
struct JournalingBookings {
    inner: InMemoryBookings,
    journal: Journal,
}

impl BookingRepository for JournalingBookings {
    fn booking(&self, id: BookingId) -> BoxFuture<'_, StoreResult<Option<Booking>>> {
        self.inner.booking(id)
    }

    fn bookings_for_hotel(&self, hotel_id: HotelId) -> BoxFuture<'_, StoreResult<Vec<Booking>>> {
        self.inner.bookings_for_hotel(hotel_id)
    }

    fn bookings_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> BoxFuture<'_, StoreResult<Vec<Booking>>> {
        self.inner.bookings_for_customer(customer_id)
    }

    fn overlapping(
        &self,
        room_ids: Vec<RoomId>,
        period: StayPeriod,
        statuses: &'static [BookingStatus],
    ) -> BoxFuture<'_, StoreResult<Vec<Booking>>> {
        self.inner.overlapping(room_ids, period, statuses)
    }

    fn insert(&self, booking: Booking, created: BookingHistory) -> BoxFuture<'_, StoreResult<()>> {
        self.inner.insert(booking, created)
    }

    fn apply_transition(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        entry: BookingHistory,
    ) -> BoxFuture<'_, StoreResult<Booking>> {
        Box::pin(async move {
            let to = entry.new_status;
            let updated = self.inner.apply_transition(booking_id, expected, entry).await?;
            self.journal.push(Write::Status(to));
            tokio::task::yield_now().await;
            Ok(updated)
        })
    }

    fn history(&self, booking_id: BookingId) -> BoxFuture<'_, StoreResult<Vec<BookingHistory>>> {
        self.inner.history(booking_id)
    }
}

/// Same-day turnover: the departing guest checks out while the next guest
/// checks in on the same room.
///
/// Each status commit is followed by its own room write before the other
/// transition commits, so the room ends in the state of the last commit.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_day_turnover_keeps_room_status_in_commit_order() {
    for _ in 0..20 {
        let journal = Journal::default();
        let catalog = Arc::new(JournalingCatalog {
            inner: InMemoryCatalog::new(),
            journal: journal.clone(),
        });
        let desk = FrontDesk::new(
            catalog.clone(),
            Arc::new(InMemoryCustomers::new()),
            Arc::new(JournalingBookings {
                inner: InMemoryBookings::new(),
                journal: journal.clone(),
            }),
            Arc::new(test_clock()),
            HoldPolicy::default(),
        );
        let fixture = HotelFixture::seed(catalog.as_ref()).await.unwrap();
        let room_id = fixture.room_id("201");

        let mut stays = Vec::new();
        for (email, check_in, check_out) in [
            ("leaving@x.com", date(2024, 1, 14), date(2024, 1, 15)),
            ("arriving@x.com", date(2024, 1, 15), date(2024, 1, 16)),
        ] {
            let booking = desk
                .create_booking(CreateBookingRequest {
                    customer: guest("Guest", email),
                    hotel_id: fixture.hotel.id,
                    check_in,
                    check_out,
                    room_ids: vec![room_id],
                    guests: 1,
                })
                .await
                .unwrap();
            desk.bookings().confirm(booking.id, "reception").await.unwrap();
            stays.push(booking.id);
        }
        desk.bookings().check_in(stays[0], "reception").await.unwrap();
        journal.take();

        let leaving = {
            let desk = desk.clone();
            let id = stays[0];
            tokio::spawn(async move { desk.bookings().check_out(id, "reception").await })
        };
        let arriving = {
            let desk = desk.clone();
            let id = stays[1];
            tokio::spawn(async move { desk.bookings().check_in(id, "reception").await })
        };
        leaving.await.expect("task completes").unwrap();
        arriving.await.expect("task completes").unwrap();

        let writes = journal.take();
        assert_eq!(writes.len(), 4, "{writes:?}");
        for pair in writes.chunks(2) {
            match pair {
                [Write::Status(BookingStatus::CheckedOut), Write::Room(RoomStatus::Cleaning)]
                | [Write::Status(BookingStatus::CheckedIn), Write::Room(RoomStatus::Occupied)] => {}
                other => panic!("room write interleaved with another commit: {writes:?} at {other:?}"),
            }
        }
        let Some(Write::Room(last)) = writes.last().copied() else {
            panic!("no room write recorded: {writes:?}");
        };
        let room = desk.catalog().room(room_id).await.unwrap().unwrap();
        assert_eq!(room.status, last);
    }
}

/// 50 concurrent requests for the same room and dates.
///
/// Exactly one wins; every other request fails with `RoomUnavailable`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_room_concurrency_50_requests() {
    const ATTEMPTS: usize = 50;
    let (desk, fixture) = setup().await;
    let room_id = fixture.room_id("201");

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for i in 0..ATTEMPTS {
        let desk = desk.clone();
        let request = CreateBookingRequest {
            customer: guest(&format!("Guest {i}"), &format!("guest{i}@x.com")),
            hotel_id: fixture.hotel.id,
            check_in: date(2024, 1, 15),
            check_out: date(2024, 1, 17),
            room_ids: vec![room_id],
            guests: 2,
        };
        handles.push(tokio::spawn(async move { desk.create_booking(request).await }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(_) => successes += 1,
            Err(BookingError::RoomUnavailable { room_id: taken, .. }) => {
                assert_eq!(taken, room_id);
                conflicts += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    println!("  successes: {successes}, conflicts: {conflicts}");

    assert_eq!(successes, 1);
    assert_eq!(conflicts, ATTEMPTS - 1);

    let stored = desk
        .bookings()
        .bookings_for_hotel(fixture.hotel.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

/// Overlapping but not identical stays on one room still conflict.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_stays_never_share_a_room() {
    let (desk, fixture) = setup().await;
    let room_id = fixture.room_id("101");

    let mut handles = Vec::new();
    for start in 1..=20u32 {
        let desk = desk.clone();
        let request = CreateBookingRequest {
            customer: guest("Repeat Guest", "repeat@x.com"),
            hotel_id: fixture.hotel.id,
            check_in: date(2024, 3, start),
            check_out: date(2024, 3, start + 3),
            room_ids: vec![room_id],
            guests: 1,
        };
        handles.push(tokio::spawn(async move { desk.create_booking(request).await }));
    }
    for handle in handles {
        let _ = handle.await.expect("task completes");
    }

    let stored = desk
        .bookings()
        .bookings_for_hotel(fixture.hotel.id)
        .await
        .unwrap();
    assert!(!stored.is_empty());
    for (i, a) in stored.iter().enumerate() {
        for b in &stored[i + 1..] {
            assert!(
                !a.period().overlaps(&b.period()),
                "{} and {} overlap",
                a.id,
                b.id
            );
        }
    }

    // Every request used the same email, so there is one customer
    let customers: HashSet<_> = stored.iter().map(|booking| booking.customer_id).collect();
    assert_eq!(customers.len(), 1);
}

/// Requests for disjoint rooms do not interfere.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_disjoint_rooms_all_succeed() {
    let (desk, fixture) = setup().await;

    let mut handles = Vec::new();
    for number in ["101", "102", "201", "202", "301"] {
        let desk = desk.clone();
        let request = CreateBookingRequest {
            customer: CustomerInfo::new(format!("Guest {number}")),
            hotel_id: fixture.hotel.id,
            check_in: date(2024, 1, 15),
            check_out: date(2024, 1, 17),
            room_ids: vec![fixture.room_id(number)],
            guests: 1,
        };
        handles.push(tokio::spawn(async move { desk.create_booking(request).await }));
    }
    for handle in handles {
        handle.await.expect("task completes").expect("booking succeeds");
    }
}

/// 20 racing confirmations and cancellations of one booking.
///
/// Only one transition out of PENDING commits; the losers see `InvalidTransition`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_transitions_commit_once() {
    let (desk, fixture) = setup().await;
    let booking = desk
        .create_booking(CreateBookingRequest {
            customer: guest("Nguyen Van A", "a@x.com"),
            hotel_id: fixture.hotel.id,
            check_in: date(2024, 1, 15),
            check_out: date(2024, 1, 17),
            room_ids: vec![fixture.room_id("301")],
            guests: 2,
        })
        .await
        .unwrap();
    let booking_id = booking.id;

    let mut handles = Vec::new();
    for i in 0..20 {
        let desk = desk.clone();
        let target = if i % 2 == 0 {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Cancelled
        };
        handles.push(tokio::spawn(async move {
            desk.transition_booking(booking_id, target, &format!("clerk-{i}"), None)
                .await
        }));
    }

    let mut committed = Vec::new();
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(updated) => committed.push(updated.status),
            Err(BookingError::InvalidTransition { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // Confirmed → Cancelled is also a legal edge, so a confirm may be
    // followed by one cancel; nothing else can commit.
    assert!(!committed.is_empty() && committed.len() <= 2, "{committed:?}");
    let history = desk.bookings().history(booking_id).await.unwrap();
    assert_eq!(history.len(), committed.len() + 1);
    let changes: Vec<_> = history[1..].iter().map(|row| row.new_status).collect();
    assert!(
        changes == [BookingStatus::Confirmed]
            || changes == [BookingStatus::Cancelled]
            || changes == [BookingStatus::Confirmed, BookingStatus::Cancelled],
        "{changes:?}"
    );
    let stored = desk.bookings().get_booking(booking_id).await.unwrap();
    assert_eq!(history.last().map(|row| row.new_status), Some(stored.status));
}

/// Concurrent submissions with the same email register one customer.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_customer_resolution_dedups() {
    let (desk, _) = setup().await;

    let mut handles = Vec::new();
    for _ in 0..25 {
        let desk = desk.clone();
        handles.push(tokio::spawn(async move {
            desk.customers()
                .resolve_customer(&guest("Nguyen Van A", "a@x.com"))
                .await
                .map(|customer| customer.id)
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.expect("task completes").unwrap());
    }
    assert_eq!(ids.len(), 1);
}
