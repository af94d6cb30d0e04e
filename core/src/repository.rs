//! Repository traits for the booking engine's persistent state.
//!
//! The booking rules never touch storage directly. They talk to three
//! repositories:
//!
//! - [`CatalogRepository`]: hotels, room types and rooms
//! - [`CustomerRepository`]: registered customers
//! - [`BookingRepository`]: bookings, room assignments and their history
//!
//! # Implementations
//!
//! - `InMemoryCatalog`, `InMemoryCustomers`, `InMemoryBookings` (in the
//!   `frontdesk-store` crate)
//!
//! # Dyn Compatibility
//!
//! These traits return [`BoxFuture`] instead of using `async fn` so they can
//! be held as `Arc<dyn BookingRepository>` by the services.
//!
//! # Atomicity
//!
//! Each method is atomic on its own. In particular
//! [`BookingRepository::insert`] stores a booking, its room assignments and
//! its creation history row together, and
//! [`BookingRepository::apply_transition`] updates the status and appends the
//! history row together, failing with [`StoreError::StatusMismatch`] if the
//! stored status is not the expected one.

use crate::calendar::StayPeriod;
use crate::error::StoreError;
use crate::status::BookingStatus;
use crate::types::{
    Booking, BookingHistory, BookingId, Customer, CustomerId, Hotel, HotelId, Room, RoomId,
    RoomStatus, RoomType, RoomTypeId,
};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by repository methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result type for repository operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Hotels, room types and rooms.
pub trait CatalogRepository: Send + Sync {
    /// Load a hotel by id.
    fn hotel(&self, id: HotelId) -> BoxFuture<'_, StoreResult<Option<Hotel>>>;

    /// Load a room type by id.
    fn room_type(&self, id: RoomTypeId) -> BoxFuture<'_, StoreResult<Option<RoomType>>>;

    /// List the room types of a hotel.
    fn room_types_for_hotel(&self, hotel_id: HotelId)
    -> BoxFuture<'_, StoreResult<Vec<RoomType>>>;

    /// Load a room by id.
    fn room(&self, id: RoomId) -> BoxFuture<'_, StoreResult<Option<Room>>>;

    /// List the rooms of a hotel.
    fn rooms_for_hotel(&self, hotel_id: HotelId) -> BoxFuture<'_, StoreResult<Vec<Room>>>;

    /// Change a room's operational status, returning the updated room.
    ///
    /// Fails with [`StoreError::Missing`] for an unknown room.
    fn set_room_status(&self, id: RoomId, status: RoomStatus)
    -> BoxFuture<'_, StoreResult<Room>>;

    /// Register a hotel.
    fn insert_hotel(&self, hotel: Hotel) -> BoxFuture<'_, StoreResult<()>>;

    /// Register a room type. Its hotel must exist.
    fn insert_room_type(&self, room_type: RoomType) -> BoxFuture<'_, StoreResult<()>>;

    /// Register a room. Its hotel and room type must exist and the door
    /// number must be unique within the hotel.
    fn insert_room(&self, room: Room) -> BoxFuture<'_, StoreResult<()>>;
}

/// Registered customers.
///
/// Email and phone lookups are exact matches on the normalized values the
/// customer directory stores.
pub trait CustomerRepository: Send + Sync {
    /// Load a customer by id.
    fn customer(&self, id: CustomerId) -> BoxFuture<'_, StoreResult<Option<Customer>>>;

    /// Find the earliest registered customer with this email.
    fn find_by_email(&self, email: String) -> BoxFuture<'_, StoreResult<Option<Customer>>>;

    /// Find the earliest registered customer with this phone number.
    fn find_by_phone(&self, phone: String) -> BoxFuture<'_, StoreResult<Option<Customer>>>;

    /// Register a customer.
    fn insert(&self, customer: Customer) -> BoxFuture<'_, StoreResult<()>>;
}

/// Bookings and their audit history.
pub trait BookingRepository: Send + Sync {
    /// Load a booking by id.
    fn booking(&self, id: BookingId) -> BoxFuture<'_, StoreResult<Option<Booking>>>;

    /// List the bookings of a hotel, oldest first.
    fn bookings_for_hotel(&self, hotel_id: HotelId) -> BoxFuture<'_, StoreResult<Vec<Booking>>>;

    /// List the bookings of a customer, oldest first.
    fn bookings_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> BoxFuture<'_, StoreResult<Vec<Booking>>>;

    /// Bookings that hold any of `room_ids`, are in one of `statuses`, and
    /// overlap `period`.
    fn overlapping(
        &self,
        room_ids: Vec<RoomId>,
        period: StayPeriod,
        statuses: &'static [BookingStatus],
    ) -> BoxFuture<'_, StoreResult<Vec<Booking>>>;

    /// Store a new booking with its room assignments and creation history row.
    fn insert(&self, booking: Booking, created: BookingHistory) -> BoxFuture<'_, StoreResult<()>>;

    /// Move a booking from `expected` to `entry.new_status` and append `entry`.
    ///
    /// Returns the updated booking. Fails with [`StoreError::StatusMismatch`]
    /// if the stored status is not `expected`, and [`StoreError::Missing`] for
    /// an unknown booking.
    fn apply_transition(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        entry: BookingHistory,
    ) -> BoxFuture<'_, StoreResult<Booking>>;

    /// History rows of a booking in commit order.
    fn history(&self, booking_id: BookingId) -> BoxFuture<'_, StoreResult<Vec<BookingHistory>>>;
}
