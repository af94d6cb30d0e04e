//! Domain types for the front desk booking engine.
//!
//! This module contains the identifiers, value objects and entities shared by
//! every layer: the catalog (hotels, room types, rooms), customers, bookings
//! and their audit history, plus the read models handed to reporting.

use crate::calendar::StayPeriod;
use crate::status::BookingStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a hotel
    HotelId
);
entity_id!(
    /// Unique identifier for a room type
    RoomTypeId
);
entity_id!(
    /// Unique identifier for a physical room
    RoomId
);
entity_id!(
    /// Unique identifier for a customer
    CustomerId
);
entity_id!(
    /// Unique identifier for a booking
    BookingId
);
entity_id!(
    /// Unique identifier for a booking history row
    HistoryId
);

// ============================================================================
// Money Value Object
// ============================================================================

/// An amount in the local currency (VND), which has no minor unit.
///
/// All arithmetic is checked; overflow surfaces as `None` and callers turn it
/// into an input error.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from a whole amount
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the whole amount
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Multiplies by a count, returning `None` on overflow
    #[must_use]
    pub const fn checked_mul(self, factor: u64) -> Option<Self> {
        match self.0.checked_mul(factor) {
            Some(product) => Some(Self(product)),
            None => None,
        }
    }

    /// Divides by a count (rounded down), returning `None` for a zero divisor
    #[must_use]
    pub const fn checked_div(self, divisor: u64) -> Option<Self> {
        match self.0.checked_div(divisor) {
            Some(quotient) => Some(Self(quotient)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} VND", self.0)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// A hotel property
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    /// Unique hotel identifier
    pub id: HotelId,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Front desk phone number
    pub phone: Option<String>,
    /// Inactive hotels are hidden from search
    pub active: bool,
}

impl Hotel {
    /// Creates a new active `Hotel`
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: HotelId::new(),
            name: name.into(),
            address: address.into(),
            city: city.into(),
            phone: None,
            active: true,
        }
    }
}

/// A class of room sharing capacity and nightly price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Unique room type identifier
    pub id: RoomTypeId,
    /// Hotel offering this room type
    pub hotel_id: HotelId,
    /// Display name (e.g. "Deluxe")
    pub name: String,
    /// Maximum number of guests per room
    pub max_guests: u32,
    /// Price per night
    pub nightly_price: Money,
}

impl RoomType {
    /// Creates a new `RoomType`
    #[must_use]
    pub fn new(hotel_id: HotelId, name: impl Into<String>, max_guests: u32, nightly_price: Money) -> Self {
        Self {
            id: RoomTypeId::new(),
            hotel_id,
            name: name.into(),
            max_guests,
            nightly_price,
        }
    }
}

/// Coarse operational status of a physical room.
///
/// This is not the authority on date availability (bookings are). It only
/// takes a room out of the bookable pool entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// Ready for guests
    #[default]
    Available,
    /// A guest is in the room
    Occupied,
    /// Being turned over after check-out
    Cleaning,
    /// Scheduled maintenance
    Maintenance,
    /// Broken, cannot be sold
    OutOfOrder,
}

impl RoomStatus {
    /// Whether a room in this status may be offered at all
    #[must_use]
    pub const fn is_bookable(self) -> bool {
        !matches!(self, Self::Maintenance | Self::OutOfOrder)
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Cleaning => "CLEANING",
            Self::Maintenance => "MAINTENANCE",
            Self::OutOfOrder => "OUT_OF_ORDER",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier
    pub id: RoomId,
    /// Hotel the room belongs to
    pub hotel_id: HotelId,
    /// Room type (capacity and price)
    pub type_id: RoomTypeId,
    /// Door number, unique within the hotel
    pub number: String,
    /// Floor
    pub floor: i32,
    /// Operational status
    pub status: RoomStatus,
}

impl Room {
    /// Creates a new available `Room`
    #[must_use]
    pub fn new(hotel_id: HotelId, type_id: RoomTypeId, number: impl Into<String>, floor: i32) -> Self {
        Self {
            id: RoomId::new(),
            hotel_id,
            type_id,
            number: number.into(),
            floor,
            status: RoomStatus::Available,
        }
    }

    /// Returns the room with a different operational status
    #[must_use]
    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = status;
        self
    }

    /// Listing order: door numbers made only of digits come first in numeric
    /// order, other numbers after them in text order, then floor, then id.
    #[must_use]
    pub fn listing_order(&self, other: &Self) -> Ordering {
        self.number_key()
            .cmp(&other.number_key())
            .then(self.floor.cmp(&other.floor))
            .then(self.id.cmp(&other.id))
    }

    fn number_key(&self) -> (bool, u64, &str) {
        let numeric = self
            .number
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| self.number.parse::<u64>().ok())
            .flatten();
        match numeric {
            Some(value) => (false, value, self.number.as_str()),
            None => (true, 0, self.number.as_str()),
        }
    }
}

// ============================================================================
// Customers
// ============================================================================

/// Contact details submitted with a booking request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Full name
    pub full_name: String,
    /// Email address (identity key, checked first)
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number (identity key, checked second)
    #[serde(default)]
    pub phone: Option<String>,
    /// Nationality
    #[serde(default)]
    pub nationality: Option<String>,
}

impl CustomerInfo {
    /// Creates contact details with only a name
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    /// Sets the email address
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the nationality
    #[must_use]
    pub fn with_nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }
}

/// A registered customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier
    pub id: CustomerId,
    /// Full name
    pub full_name: String,
    /// Normalized email address
    pub email: Option<String>,
    /// Normalized phone number
    pub phone: Option<String>,
    /// Nationality
    pub nationality: Option<String>,
    /// When the customer was first registered
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Bookings
// ============================================================================

/// A room assigned to a booking with the price committed for the stay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRoom {
    /// Owning booking
    pub booking_id: BookingId,
    /// Assigned room
    pub room_id: RoomId,
    /// Price of this room for the whole stay
    pub price: Money,
}

/// A reservation of one or more rooms for a stay period
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier
    pub id: BookingId,
    /// Customer holding the booking
    pub customer_id: CustomerId,
    /// Hotel the rooms belong to
    pub hotel_id: HotelId,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure date (not a night of the stay)
    pub check_out: NaiveDate,
    /// Party size
    pub guests: u32,
    /// Committed price, fixed at creation
    pub total_cost: Money,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// Room assignments
    pub rooms: SmallVec<[BookingRoom; 2]>,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Stay period covered by the booking
    #[must_use]
    pub const fn period(&self) -> StayPeriod {
        StayPeriod::from_parts(self.check_in, self.check_out)
    }

    /// Number of nights in the stay
    #[must_use]
    pub fn nights(&self) -> u32 {
        self.period().nights()
    }

    /// Whether the booking holds the given room
    #[must_use]
    pub fn holds_room(&self, room_id: RoomId) -> bool {
        self.rooms.iter().any(|assignment| assignment.room_id == room_id)
    }

    /// Ids of all rooms held by the booking
    pub fn room_ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.iter().map(|assignment| assignment.room_id)
    }
}

/// Append-only audit row for a booking status change
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingHistory {
    /// Unique history row identifier
    pub id: HistoryId,
    /// Booking whose status changed
    pub booking_id: BookingId,
    /// Previous status (`None` for the creation row)
    pub old_status: Option<BookingStatus>,
    /// New status
    pub new_status: BookingStatus,
    /// Staff member or system actor responsible
    pub changed_by: String,
    /// When the change was committed
    pub changed_at: DateTime<Utc>,
    /// Optional free-text reason
    pub reason: Option<String>,
}

impl BookingHistory {
    /// Creates a history row for a status change
    #[must_use]
    pub fn new(
        booking_id: BookingId,
        old_status: Option<BookingStatus>,
        new_status: BookingStatus,
        changed_by: impl Into<String>,
        changed_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            booking_id,
            old_status,
            new_status,
            changed_by: changed_by.into(),
            changed_at,
            reason,
        }
    }
}

/// Request to reserve rooms for a customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Contact details used to resolve or register the customer
    pub customer: CustomerInfo,
    /// Hotel the rooms belong to
    pub hotel_id: HotelId,
    /// First night of the stay
    pub check_in: NaiveDate,
    /// Departure date
    pub check_out: NaiveDate,
    /// Rooms to reserve
    pub room_ids: Vec<RoomId>,
    /// Party size
    #[serde(default = "default_guests")]
    pub guests: u32,
}

const fn default_guests() -> u32 {
    1
}

// ============================================================================
// Read Models
// ============================================================================

/// An available room priced for a specific stay
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOffer {
    /// The room
    pub room: Room,
    /// Its room type
    pub room_type: RoomType,
    /// Nights in the requested stay
    pub nights: u32,
    /// Price of the room for the whole stay
    pub total: Money,
}

/// Revenue totals over a date range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSummary {
    /// Sum of committed booking totals
    pub total: Money,
    /// Number of bookings counted
    pub count: u64,
    /// `total / count`, zero when nothing was counted
    pub average: Money,
}

/// Room usage of a hotel on one night
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    /// Hotel
    pub hotel_id: HotelId,
    /// The night being described
    pub date: NaiveDate,
    /// All rooms in the hotel
    pub total_rooms: u32,
    /// Rooms held by a blocking booking that night
    pub occupied_rooms: u32,
    /// Rooms in maintenance or out of order
    pub out_of_service_rooms: u32,
}

impl OccupancySnapshot {
    /// Rooms neither occupied nor out of service
    #[must_use]
    pub const fn free_rooms(&self) -> u32 {
        self.total_rooms
            .saturating_sub(self.occupied_rooms)
            .saturating_sub(self.out_of_service_rooms)
    }
}
