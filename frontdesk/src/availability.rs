//! Availability engine.
//!
//! Answers "which rooms of this hotel can host this party for these dates".
//! A room qualifies when its type seats the party, it is not out of service,
//! and no blocking booking overlaps the stay. Blocking is decided by the
//! configured [`HoldPolicy`]. Inactive hotels offer nothing.
//!
//! Searches take no locks. A room reported free can still be taken before the
//! caller books it; booking creation re-checks under the room lock.

use frontdesk_core::calendar::{StayPeriod, stay_price};
use frontdesk_core::error::{BookingError, Result};
use frontdesk_core::repository::{BookingRepository, CatalogRepository};
use frontdesk_core::status::HoldPolicy;
use frontdesk_core::types::{HotelId, Room, RoomId, RoomOffer, RoomType, RoomTypeId};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Read-only room search over the catalog and existing bookings.
pub struct AvailabilityEngine {
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
    policy: HoldPolicy,
}

impl AvailabilityEngine {
    /// Create an engine
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

    /// The hold policy used to decide which bookings block a room
    #[must_use]
    pub const fn policy(&self) -> HoldPolicy {
        self.policy
    }

    /// Rooms of `hotel_id` that can host `guests` for the stay.
    ///
    /// Sorted by [`Room::listing_order`]. An unknown or inactive hotel
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidInput`] if `check_out <= check_in` or `guests == 0`
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(skip(self), fields(policy = ?self.policy))]
    pub async fn find_available_rooms(
        &self,
        hotel_id: HotelId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<Room>> {
        let period = StayPeriod::new(check_in, check_out)?;
        if guests == 0 {
            return Err(BookingError::invalid_input("guests must be at least 1"));
        }
        if !self.catalog.hotel(hotel_id).await?.is_some_and(|hotel| hotel.active) {
            tracing::debug!("Hotel unknown or inactive, nothing on offer");
            return Ok(Vec::new());
        }
        let rooms = self
            .available(hotel_id, period, guests)
            .await?
            .into_iter()
            .map(|(room, _)| room)
            .collect::<Vec<_>>();
        tracing::debug!(available = rooms.len(), "Availability computed");
        Ok(rooms)
    }

    /// Available rooms priced for the stay.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown hotel
    /// - [`BookingError::InvalidInput`] for an inactive hotel, a bad stay,
    ///   zero guests, or a price that overflows
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(skip(self))]
    pub async fn quote(
        &self,
        hotel_id: HotelId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<RoomOffer>> {
        let period = StayPeriod::new(check_in, check_out)?;
        let hotel = self
            .catalog
            .hotel(hotel_id)
            .await?
            .ok_or_else(|| BookingError::not_found("Hotel", hotel_id))?;
        if !hotel.active {
            return Err(BookingError::invalid_input(format!(
                "hotel {} is not accepting bookings",
                hotel.name
            )));
        }
        let nights = period.nights();
        self.available(hotel_id, period, guests)
            .await?
            .into_iter()
            .map(|(room, room_type)| {
                Ok(RoomOffer {
                    total: stay_price(room_type.nightly_price, nights)?,
                    room,
                    room_type,
                    nights,
                })
            })
            .collect()
    }

    async fn available(
        &self,
        hotel_id: HotelId,
        period: StayPeriod,
        guests: u32,
    ) -> Result<Vec<(Room, RoomType)>> {
        if guests == 0 {
            return Err(BookingError::invalid_input("guests must be at least 1"));
        }

        let room_types: HashMap<RoomTypeId, RoomType> = self
            .catalog
            .room_types_for_hotel(hotel_id)
            .await?
            .into_iter()
            .map(|room_type| (room_type.id, room_type))
            .collect();

        let mut candidates: Vec<(Room, RoomType)> = self
            .catalog
            .rooms_for_hotel(hotel_id)
            .await?
            .into_iter()
            .filter(|room| room.status.is_bookable())
            .filter_map(|room| {
                let room_type = room_types.get(&room.type_id)?;
                (room_type.max_guests >= guests).then(|| (room, room_type.clone()))
            })
            .collect();
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let room_ids: Vec<RoomId> = candidates.iter().map(|(room, _)| room.id).collect();
        let blocked: HashSet<RoomId> = self
            .bookings
            .overlapping(room_ids, period, self.policy.blocking_statuses())
            .await?
            .iter()
            .flat_map(|booking| booking.room_ids().collect::<Vec<_>>())
            .collect();

        candidates.retain(|(room, _)| !blocked.contains(&room.id));
        candidates.sort_by(|(a, _), (b, _)| a.listing_order(b));
        Ok(candidates)
    }
}
