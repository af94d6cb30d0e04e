//! Revenue and occupancy reporting.
//!
//! Read-only aggregates over stored bookings. Revenue counts CONFIRMED,
//! CHECKED_IN and CHECKED_OUT bookings at their committed price; cancelled,
//! no-show and still-pending bookings contribute nothing.

use chrono::NaiveDate;
use frontdesk_core::calendar::StayPeriod;
use frontdesk_core::error::{BookingError, Result};
use frontdesk_core::repository::{BookingRepository, CatalogRepository};
use frontdesk_core::status::HoldPolicy;
use frontdesk_core::types::{HotelId, Money, OccupancySnapshot, RevenueSummary, RoomId};
use std::collections::HashSet;
use std::sync::Arc;

/// Computes revenue summaries and occupancy snapshots.
pub struct RevenueAggregator {
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
    policy: HoldPolicy,
}

impl RevenueAggregator {
    /// Create an aggregator
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        bookings: Arc<dyn BookingRepository>,
        policy: HoldPolicy,
    ) -> Self {
        Self {
            catalog,
            bookings,
            policy,
        }
    }

    /// Revenue of bookings checking in within `[date_from, date_to]`, both
    /// ends inclusive.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidInput`] if `date_from > date_to` or the total overflows
    /// - [`BookingError::NotFound`] for an unknown hotel
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(skip(self))]
    pub async fn revenue(
        &self,
        hotel_id: HotelId,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<RevenueSummary> {
        if date_from > date_to {
            return Err(BookingError::invalid_input(format!(
                "date_from {date_from} is after date_to {date_to}"
            )));
        }
        self.require_hotel(hotel_id).await?;

        let mut total = Money::ZERO;
        let mut count: u64 = 0;
        for booking in self.bookings.bookings_for_hotel(hotel_id).await? {
            if !booking.status.counts_toward_revenue()
                || booking.check_in < date_from
                || booking.check_in > date_to
            {
                continue;
            }
            total = total
                .checked_add(booking.total_cost)
                .ok_or_else(|| BookingError::invalid_input("revenue total overflows"))?;
            count += 1;
        }

        let summary = RevenueSummary {
            total,
            count,
            average: total.checked_div(count).unwrap_or(Money::ZERO),
        };
        tracing::debug!(total = summary.total.amount(), count, "Revenue computed");
        Ok(summary)
    }

    /// Room usage of `hotel_id` on the night starting at `date`.
    ///
    /// A room is occupied when a blocking booking covers that night. Rooms in
    /// maintenance or out of order count as out of service unless a booking
    /// still holds them.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown hotel
    /// - [`BookingError::InvalidInput`] for the last representable date
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(skip(self))]
    pub async fn occupancy(&self, hotel_id: HotelId, date: NaiveDate) -> Result<OccupancySnapshot> {
        self.require_hotel(hotel_id).await?;
        let next_day = date
            .succ_opt()
            .ok_or_else(|| BookingError::invalid_input(format!("no night follows {date}")))?;
        let night = StayPeriod::new(date, next_day)?;

        let rooms = self.catalog.rooms_for_hotel(hotel_id).await?;
        let room_ids: Vec<RoomId> = rooms.iter().map(|room| room.id).collect();
        let held: HashSet<RoomId> = self
            .bookings
            .overlapping(room_ids, night, self.policy.blocking_statuses())
            .await?
            .iter()
            .flat_map(|booking| booking.room_ids().collect::<Vec<_>>())
            .collect();

        let occupied = rooms.iter().filter(|room| held.contains(&room.id)).count();
        let out_of_service = rooms
            .iter()
            .filter(|room| !room.status.is_bookable() && !held.contains(&room.id))
            .count();

        Ok(OccupancySnapshot {
            hotel_id,
            date,
            total_rooms: saturating_u32(rooms.len()),
            occupied_rooms: saturating_u32(occupied),
            out_of_service_rooms: saturating_u32(out_of_service),
        })
    }

    async fn require_hotel(&self, hotel_id: HotelId) -> Result<()> {
        match self.catalog.hotel(hotel_id).await? {
            Some(_) => Ok(()),
            None => Err(BookingError::not_found("Hotel", hotel_id)),
        }
    }
}

fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
