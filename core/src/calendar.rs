//! Calendar and pricing arithmetic.
//!
//! Stays are half-open date ranges: the guest sleeps on every night from
//! `check_in` up to, but not including, `check_out`. A checkout on day N and a
//! new check-in on day N therefore never overlap.
//!
//! Night counting follows the front desk rule `ceil(hours / 24)` with a floor
//! of one night, so it stays exact for calendar dates (treated as midnight
//! local) and still gives a sensible answer for date-times.

use crate::error::{BookingError, Result};
use crate::types::Money;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const SECONDS_PER_NIGHT: i64 = 24 * 60 * 60;

/// A validated `[check_in, check_out)` stay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayPeriod {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayPeriod {
    /// Creates a stay period.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidInput`] unless `check_out` is strictly
    /// after `check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(BookingError::invalid_input(format!(
                "check-out {check_out} must be after check-in {check_in}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Builds a period from stored booking dates without re-validating them.
    pub(crate) const fn from_parts(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    /// First night of the stay
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Departure date
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights, at least one
    #[must_use]
    pub fn nights(&self) -> u32 {
        ceil_nights((self.check_out - self.check_in).num_seconds())
    }

    /// Whether two stays share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Whether the guest sleeps in the room on `date`.
    #[must_use]
    pub fn covers_night(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

/// Nights between two calendar dates.
///
/// # Errors
///
/// Returns [`BookingError::InvalidInput`] unless `check_out` is after `check_in`.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> Result<u32> {
    StayPeriod::new(check_in, check_out).map(|period| period.nights())
}

/// Nights between two date-times, rounding partial days up.
///
/// # Errors
///
/// Returns [`BookingError::InvalidInput`] unless `end` is after `start`.
pub fn nights_between(start: NaiveDateTime, end: NaiveDateTime) -> Result<u32> {
    if end <= start {
        return Err(BookingError::invalid_input(format!(
            "end {end} must be after start {start}"
        )));
    }
    Ok(ceil_nights((end - start).num_seconds()))
}

/// Price of a stay at a nightly rate.
///
/// # Errors
///
/// Returns [`BookingError::InvalidInput`] if the product overflows.
pub fn stay_price(nightly_rate: Money, nights: u32) -> Result<Money> {
    nightly_rate
        .checked_mul(u64::from(nights))
        .ok_or_else(|| {
            BookingError::invalid_input(format!(
                "price of {nights} nights at {nightly_rate} overflows"
            ))
        })
}

fn ceil_nights(seconds: i64) -> u32 {
    let nights = seconds.saturating_add(SECONDS_PER_NIGHT - 1) / SECONDS_PER_NIGHT;
    u32::try_from(nights.max(1)).unwrap_or(u32::MAX)
}
