//! # Front Desk Testing
//!
//! Testing utilities and fixtures for the front desk booking engine.
//!
//! This crate provides:
//! - Deterministic clocks implementing the `Clock` environment trait
//! - A seeded hotel fixture with a known room layout and prices
//! - Small helpers for dates, guests and test logging
//! - proptest strategies for stay periods and booking statuses
//!
//! ## Example
//!
//! ```ignore
//! use frontdesk_testing::{HotelFixture, date, guest, test_clock};
//! use frontdesk_store::InMemoryCatalog;
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let catalog = InMemoryCatalog::new();
//!     let fixture = HotelFixture::seed(&catalog).await.unwrap();
//!     let room_id = fixture.room_id("201");
//!     // ...
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use frontdesk_core::environment::Clock;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use frontdesk_testing::mocks::FixedClock;
    /// use frontdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when the test advances it.
    ///
    /// Used where ordering of timestamps matters, such as history rows or
    /// the no-show cutoff.
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a manual clock starting at the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2024-01-10 08:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2024-01-10T08:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Seeded catalog data with a known layout.
pub mod fixtures {
    use frontdesk_core::error::StoreError;
    use frontdesk_core::repository::CatalogRepository;
    use frontdesk_core::types::{Hotel, Money, Room, RoomId, RoomType};

    /// One hotel with three room types and five rooms:
    ///
    /// | Room | Floor | Type | Guests | Nightly |
    /// |---|---|---|---|---|
    /// | 101, 102 | 1 | Standard | 2 | 500 000 |
    /// | 201, 202 | 2 | Deluxe | 2 | 800 000 |
    /// | 301 | 3 | Suite | 4 | 1 500 000 |
    #[derive(Clone, Debug)]
    pub struct HotelFixture {
        /// The hotel
        pub hotel: Hotel,
        /// Standard rooms, 2 guests
        pub standard: RoomType,
        /// Deluxe rooms, 2 guests
        pub deluxe: RoomType,
        /// Suite, 4 guests
        pub suite: RoomType,
        /// All rooms, sorted by number
        pub rooms: Vec<Room>,
    }

    impl HotelFixture {
        /// Nightly price of a standard room
        pub const STANDARD_RATE: Money = Money::new(500_000);
        /// Nightly price of a deluxe room
        pub const DELUXE_RATE: Money = Money::new(800_000);
        /// Nightly price of the suite
        pub const SUITE_RATE: Money = Money::new(1_500_000);

        /// Build the fixture and register it in `catalog`.
        ///
        /// # Errors
        ///
        /// Returns the catalog's error if any insert fails.
        pub async fn seed(catalog: &dyn CatalogRepository) -> Result<Self, StoreError> {
            let hotel = Hotel::new("Riverside Saigon", "12 Ton Duc Thang", "Ho Chi Minh City");
            let standard = RoomType::new(hotel.id, "Standard", 2, Self::STANDARD_RATE);
            let deluxe = RoomType::new(hotel.id, "Deluxe", 2, Self::DELUXE_RATE);
            let suite = RoomType::new(hotel.id, "Suite", 4, Self::SUITE_RATE);
            let rooms = vec![
                Room::new(hotel.id, standard.id, "101", 1),
                Room::new(hotel.id, standard.id, "102", 1),
                Room::new(hotel.id, deluxe.id, "201", 2),
                Room::new(hotel.id, deluxe.id, "202", 2),
                Room::new(hotel.id, suite.id, "301", 3),
            ];

            catalog.insert_hotel(hotel.clone()).await?;
            for room_type in [&standard, &deluxe, &suite] {
                catalog.insert_room_type(room_type.clone()).await?;
            }
            for room in &rooms {
                catalog.insert_room(room.clone()).await?;
            }

            Ok(Self {
                hotel,
                standard,
                deluxe,
                suite,
                rooms,
            })
        }

        /// Look up a room by door number
        #[must_use]
        pub fn room(&self, number: &str) -> Option<&Room> {
            self.rooms.iter().find(|room| room.number == number)
        }

        /// Id of a room by door number
        ///
        /// # Panics
        ///
        /// Panics if the fixture has no room with that number.
        #[must_use]
        #[allow(clippy::expect_used)]
        pub fn room_id(&self, number: &str) -> RoomId {
            self.room(number).expect("fixture room number").id
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use super::NaiveDate;
    use frontdesk_core::types::CustomerInfo;

    /// Calendar date shorthand
    ///
    /// # Panics
    ///
    /// Panics on an impossible date.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    }

    /// Contact details with a name and email
    #[must_use]
    pub fn guest(name: &str, email: &str) -> CustomerInfo {
        CustomerInfo::new(name).with_email(email)
    }

    /// Install a test-friendly tracing subscriber (idempotent)
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use super::NaiveDate;
    use chrono::Duration;
    use frontdesk_core::calendar::StayPeriod;
    use frontdesk_core::status::BookingStatus;
    use proptest::prelude::*;

    /// Stays starting within `horizon_days` of `base`, lasting 1 to `max_nights` nights.
    pub fn stay_period(
        base: NaiveDate,
        horizon_days: i64,
        max_nights: i64,
    ) -> impl Strategy<Value = StayPeriod> {
        (0..horizon_days.max(1), 1..=max_nights.max(1)).prop_filter_map(
            "stay period out of calendar range",
            move |(offset, length)| {
                let check_in = base.checked_add_signed(Duration::days(offset))?;
                let check_out = check_in.checked_add_signed(Duration::days(length))?;
                StayPeriod::new(check_in, check_out).ok()
            },
        )
    }

    /// Any booking status
    pub fn booking_status() -> impl Strategy<Value = BookingStatus> {
        proptest::sample::select(BookingStatus::ALL.to_vec())
    }

    /// Party sizes a hotel front desk realistically sees
    pub fn guests() -> impl Strategy<Value = u32> {
        1u32..=5
    }
}

// Re-export commonly used items
pub use fixtures::HotelFixture;
pub use helpers::{date, guest, init_test_tracing};
pub use mocks::{FixedClock, ManualClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(clock.today(), date(2024, 1, 10));
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(test_clock().now());
        let before = clock.now();
        clock.advance(Duration::hours(25));
        assert_eq!(clock.now() - before, Duration::hours(25));
        assert_eq!(clock.today(), date(2024, 1, 11));
    }
}
