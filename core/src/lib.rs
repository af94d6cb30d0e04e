//! # Front Desk Core
//!
//! Domain types and seams for the hotel front desk booking engine.
//!
//! This crate holds everything the booking engine agrees on but does not
//! execute: typed entities, the booking status state machine, calendar and
//! pricing arithmetic, the error taxonomy, and the repository traits that
//! storage backends implement.
//!
//! ## Core Concepts
//!
//! - **Catalog**: hotels, room types and physical rooms
//! - **Stay period**: a half-open `[check_in, check_out)` date range
//! - **Booking**: a customer's claim on one or more rooms for a stay period
//! - **History**: an append-only audit row per accepted status change
//! - **Hold policy**: which booking statuses block a room for availability
//! - **Reducer**: `(state, action, env) → (state', effects)` for the booking lifecycle
//!
//! ## Architecture Principles
//!
//! - Explicit, typed state (tagged enums, no string statuses)
//! - Dependencies injected as traits (`Clock`, repositories)
//! - Storage backends substitutable without touching booking rules
//!
//! ## Example
//!
//! ```
//! use frontdesk_core::calendar::{StayPeriod, stay_price};
//! use frontdesk_core::types::Money;
//! use chrono::NaiveDate;
//!
//! # fn main() -> Result<(), frontdesk_core::error::BookingError> {
//! let check_in = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
//! let check_out = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap_or_default();
//! let period = StayPeriod::new(check_in, check_out)?;
//!
//! assert_eq!(period.nights(), 2);
//! assert_eq!(stay_price(Money::new(800_000), period.nights())?, Money::new(1_600_000));
//! # Ok(())
//! # }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod booking;
pub mod calendar;
pub mod error;
pub mod reducer;
pub mod repository;
pub mod status;
pub mod types;

pub use booking::{BookingAction, BookingEffect, BookingEnvironment, BookingReducer, BookingState};
pub use calendar::StayPeriod;
pub use error::{BookingError, ErrorKind, StoreError};
pub use reducer::Reducer;
pub use status::{BookingStatus, HoldPolicy};

/// Environment module - Dependency injection traits
///
/// All ambient dependencies of the booking engine are abstracted behind
/// traits so tests can pin them down.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// assert_eq!(clock.today(), clock.now().date_naive());
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Get the current calendar date
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
