//! In-memory booking store with an append-only history log.

use crate::poisoned;
use frontdesk_core::calendar::StayPeriod;
use frontdesk_core::error::StoreError;
use frontdesk_core::repository::{BookingRepository, BoxFuture, StoreResult};
use frontdesk_core::status::BookingStatus;
use frontdesk_core::types::{
    Booking, BookingHistory, BookingId, CustomerId, HotelId, RoomId,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct BookingTables {
    bookings: HashMap<BookingId, Booking>,
    // Insertion order, for stable listings.
    order: Vec<BookingId>,
    by_room: HashMap<RoomId, Vec<BookingId>>,
    history: HashMap<BookingId, Vec<BookingHistory>>,
}

impl BookingTables {
    fn collect<F>(&self, mut keep: F) -> Vec<Booking>
    where
        F: FnMut(&Booking) -> bool,
    {
        self.order
            .iter()
            .filter_map(|id| self.bookings.get(id))
            .filter(|booking| keep(booking))
            .cloned()
            .collect()
    }
}

/// Bookings held in memory.
///
/// Bookings are never removed. Status changes go through
/// [`BookingRepository::apply_transition`], which writes the new status and
/// its history row under one write lock.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBookings {
    tables: Arc<RwLock<BookingTables>>,
}

impl InMemoryBookings {
    /// Create an empty booking store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bookings
    ///
    /// Returns zero if the table lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().map_or(0, |tables| tables.bookings.len())
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BookingRepository for InMemoryBookings {
    fn booking(&self, id: BookingId) -> BoxFuture<'_, StoreResult<Option<Booking>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.bookings.get(&id).cloned())
        })
    }

    fn bookings_for_hotel(&self, hotel_id: HotelId) -> BoxFuture<'_, StoreResult<Vec<Booking>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.collect(|booking| booking.hotel_id == hotel_id))
        })
    }

    fn bookings_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> BoxFuture<'_, StoreResult<Vec<Booking>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.collect(|booking| booking.customer_id == customer_id))
        })
    }

    fn overlapping(
        &self,
        room_ids: Vec<RoomId>,
        period: StayPeriod,
        statuses: &'static [BookingStatus],
    ) -> BoxFuture<'_, StoreResult<Vec<Booking>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            let mut candidates: Vec<BookingId> = room_ids
                .iter()
                .filter_map(|room_id| tables.by_room.get(room_id))
                .flatten()
                .copied()
                .collect();
            candidates.sort_unstable();
            candidates.dedup();

            let mut conflicts: Vec<Booking> = candidates
                .iter()
                .filter_map(|id| tables.bookings.get(id))
                .filter(|booking| statuses.contains(&booking.status))
                .filter(|booking| booking.period().overlaps(&period))
                .cloned()
                .collect();
            conflicts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(conflicts)
        })
    }

    fn insert(&self, booking: Booking, created: BookingHistory) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            debug_assert_eq!(created.booking_id, booking.id);
            debug_assert_eq!(created.old_status, None);
            debug_assert_eq!(created.new_status, booking.status);

            let mut tables = self.tables.write().map_err(poisoned)?;
            if tables.bookings.contains_key(&booking.id) {
                return Err(StoreError::Duplicate(format!("booking {}", booking.id)));
            }
            for room_id in booking.room_ids() {
                tables.by_room.entry(room_id).or_default().push(booking.id);
            }
            tables.order.push(booking.id);
            tables.history.insert(booking.id, vec![created]);
            tables.bookings.insert(booking.id, booking);
            Ok(())
        })
    }

    fn apply_transition(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        entry: BookingHistory,
    ) -> BoxFuture<'_, StoreResult<Booking>> {
        Box::pin(async move {
            debug_assert_eq!(entry.booking_id, booking_id);
            debug_assert_eq!(entry.old_status, Some(expected));

            let mut tables = self.tables.write().map_err(poisoned)?;
            let booking = tables
                .bookings
                .get_mut(&booking_id)
                .ok_or_else(|| StoreError::Missing(format!("booking {booking_id}")))?;
            if booking.status != expected {
                return Err(StoreError::StatusMismatch {
                    expected,
                    actual: booking.status,
                });
            }
            booking.status = entry.new_status;
            booking.updated_at = entry.changed_at;
            let updated = booking.clone();

            let log = tables.history.entry(booking_id).or_default();
            log.push(entry);
            debug_assert_eq!(log.last().map(|row| row.new_status), Some(updated.status));
            Ok(updated)
        })
    }

    fn history(&self, booking_id: BookingId) -> BoxFuture<'_, StoreResult<Vec<BookingHistory>>> {
        Box::pin(async move {
            let tables = self.tables.read().map_err(poisoned)?;
            Ok(tables.history.get(&booking_id).cloned().unwrap_or_default())
        })
    }
}
