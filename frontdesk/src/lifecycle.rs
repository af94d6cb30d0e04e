//! Booking lifecycle manager.
//!
//! Creates bookings and drives them through the status state machine:
//!
//! ```text
//! create ─▶ PENDING ─▶ CONFIRMED ─▶ CHECKED_IN ─▶ CHECKED_OUT
//!              │           │  │
//!              ▼           ▼  ▼
//!          CANCELLED ◀─────┘  NO_SHOW
//! ```
//!
//! # Concurrency
//!
//! - Creation holds the mutex of every requested room across the overlap
//!   check and the insert. Requests sharing a room are serialized; disjoint
//!   requests run in parallel.
//! - The customer is resolved before any room lock is taken.
//! - Check-in and check-out hold the room locks across the status write and
//!   the room status update.
//! - Transitions are compare-and-set on the stored status. Of two racing
//!   transitions from the same status exactly one commits; the other sees
//!   `InvalidTransition` from the status the winner wrote.
//!
//! # Reducer
//!
//! The rules live in [`BookingReducer`]: it checks the edge, stamps the
//! history row and returns the effects to run. This manager loads state,
//! dispatches the action and executes the effects in order, holding any
//! room locks until the last one finished.
//!
//! # Side Effects
//!
//! After a committed check-in the booking's rooms are marked OCCUPIED, after
//! a check-out they are marked CLEANING. The write happens under the room
//! locks so a same-day check-out and check-in on one room land in commit
//! order. These updates are best effort: a failure is logged and never
//! undoes the transition.

use crate::customers::CustomerDirectory;
use crate::locks::{KeyedGuard, KeyedLocks};
use crate::metrics;
use chrono::NaiveDate;
use frontdesk_core::booking::{
    BookingAction, BookingEffect, BookingEnvironment, BookingReducer, BookingState,
};
use frontdesk_core::calendar::{StayPeriod, stay_price};
use frontdesk_core::environment::Clock;
use frontdesk_core::error::{BookingError, Result, StoreError};
use frontdesk_core::reducer::Reducer;
use frontdesk_core::repository::{BookingRepository, CatalogRepository};
use frontdesk_core::status::{BookingStatus, HoldPolicy};
use frontdesk_core::types::{
    Booking, BookingHistory, BookingId, CreateBookingRequest, CustomerId, HotelId, Money, Room,
    RoomId, RoomStatus,
};
use std::collections::HashSet;
use std::sync::Arc;

pub use frontdesk_core::booking::{CREATED_BY, NO_SHOW_REASON};

/// Creates bookings and applies status transitions.
pub struct BookingManager {
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
    customers: Arc<CustomerDirectory>,
    reducer: BookingReducer,
    env: BookingEnvironment,
    room_locks: KeyedLocks<RoomId>,
}

impl BookingManager {
    /// Create a manager
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        bookings: Arc<dyn BookingRepository>,
        customers: Arc<CustomerDirectory>,
        clock: Arc<dyn Clock>,
        policy: HoldPolicy,
    ) -> Self {
        Self {
            catalog,
            bookings,
            customers,
            reducer: BookingReducer::new(),
            env: BookingEnvironment::new(clock, policy),
            room_locks: KeyedLocks::new(),
        }
    }

    /// The hold policy used for conflict checks
    #[must_use]
    pub const fn policy(&self) -> HoldPolicy {
        self.env.policy
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Reserve rooms for a customer, producing a PENDING booking.
    ///
    /// Either the booking, its room assignments and its creation history row
    /// are all stored, or nothing is.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidInput`] for a bad stay, an empty or repeated
    ///   room list, zero guests, an inactive hotel, a room of another hotel,
    ///   an out-of-service room, insufficient combined capacity, or a price
    ///   overflow
    /// - [`BookingError::NotFound`] for an unknown hotel, room or room type
    /// - [`BookingError::RoomUnavailable`] if a blocking booking overlaps the
    ///   stay on any requested room
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(
        skip(self, request),
        fields(hotel_id = %request.hotel_id, rooms = request.room_ids.len(), guests = request.guests)
    )]
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking> {
        let period = StayPeriod::new(request.check_in, request.check_out)?;
        validate_room_list(&request.room_ids)?;
        if request.guests == 0 {
            return Err(BookingError::invalid_input("guests must be at least 1"));
        }

        let priced = self.price_rooms(&request, period).await?;
        let customer = self.customers.resolve_customer(&request.customer).await?;

        let action = BookingAction::Create {
            booking_id: BookingId::new(),
            customer_id: customer.id,
            hotel_id: request.hotel_id,
            period,
            guests: request.guests,
            rooms: priced.iter().map(|(room, price)| (room.id, *price)).collect(),
        };
        let booking = self.dispatch(BookingState::new(), action).await?;

        tracing::info!(
            booking_id = %booking.id,
            customer_id = %booking.customer_id,
            total = booking.total_cost.amount(),
            "Booking created"
        );
        Ok(booking)
    }

    /// Check every requested room and price it for the stay.
    async fn price_rooms(
        &self,
        request: &CreateBookingRequest,
        period: StayPeriod,
    ) -> Result<Vec<(Room, Money)>> {
        let hotel = self
            .catalog
            .hotel(request.hotel_id)
            .await?
            .ok_or_else(|| BookingError::not_found("Hotel", request.hotel_id))?;
        if !hotel.active {
            return Err(BookingError::invalid_input(format!(
                "hotel {} is not accepting bookings",
                hotel.name
            )));
        }

        let nights = period.nights();
        let mut capacity: u32 = 0;
        let mut priced = Vec::with_capacity(request.room_ids.len());
        for room_id in &request.room_ids {
            let room = self
                .catalog
                .room(*room_id)
                .await?
                .ok_or_else(|| BookingError::not_found("Room", room_id))?;
            if room.hotel_id != request.hotel_id {
                return Err(BookingError::invalid_input(format!(
                    "room {} does not belong to hotel {}",
                    room.number, request.hotel_id
                )));
            }
            if !room.status.is_bookable() {
                return Err(BookingError::invalid_input(format!(
                    "room {} is out of service ({})",
                    room.number, room.status
                )));
            }
            let room_type = self
                .catalog
                .room_type(room.type_id)
                .await?
                .ok_or_else(|| BookingError::not_found("RoomType", room.type_id))?;

            capacity = capacity.saturating_add(room_type.max_guests);
            priced.push((room, stay_price(room_type.nightly_price, nights)?));
        }

        if capacity < request.guests {
            return Err(BookingError::invalid_input(format!(
                "selected rooms seat {capacity} guests, {} requested",
                request.guests
            )));
        }
        Ok(priced)
    }

    // ========================================================================
    // Effect execution
    // ========================================================================

    /// Run `action` through the reducer and execute its effects in order.
    ///
    /// Stops at the first failing effect. Room locks taken by a
    /// [`BookingEffect::LockRooms`] are held until every later effect ran.
    async fn dispatch(&self, mut state: BookingState, action: BookingAction) -> Result<Booking> {
        let effects = self.reducer.reduce(&mut state, action, &self.env);
        if let Some(error) = state.last_error {
            return Err(error);
        }

        let mut guard: Option<KeyedGuard> = None;
        let mut committed = None;
        for effect in effects {
            match effect {
                BookingEffect::LockRooms { room_ids } => {
                    let held = self.room_locks.lock_all(&room_ids).await;
                    debug_assert!(!held.is_empty());
                    tracing::debug!(rooms = held.len(), "Room locks held");
                    guard = Some(held);
                }
                BookingEffect::EnsureRoomsFree {
                    room_ids,
                    period,
                    exclude,
                } => self.ensure_rooms_free(&room_ids, period, exclude).await?,
                BookingEffect::Insert { booking, created } => {
                    self.bookings.insert(booking.clone(), created).await?;
                    metrics::record_booking_created(booking.status, booking.total_cost);
                    committed = Some(booking);
                }
                BookingEffect::CompareAndSet { expected, entry } => {
                    committed = Some(self.compare_and_set(expected, entry).await?);
                }
                BookingEffect::SetRoomStatus { room_ids, status } => {
                    self.set_room_status(&room_ids, status).await;
                }
            }
        }
        drop(guard);

        committed.ok_or_else(|| BookingError::invalid_input("action changed nothing"))
    }

    /// Fail if a blocking booking other than `exclude` overlaps `period` on
    /// any of `room_ids`. Callers hold the room locks.
    async fn ensure_rooms_free(
        &self,
        room_ids: &[RoomId],
        period: StayPeriod,
        exclude: Option<BookingId>,
    ) -> Result<()> {
        let held: HashSet<RoomId> = self
            .bookings
            .overlapping(room_ids.to_vec(), period, self.env.policy.blocking_statuses())
            .await?
            .iter()
            .filter(|booking| Some(booking.id) != exclude)
            .flat_map(|booking| booking.room_ids().collect::<Vec<_>>())
            .collect();

        let Some(taken) = room_ids.iter().find(|room_id| held.contains(room_id)) else {
            return Ok(());
        };
        let room_number = self
            .catalog
            .room(*taken)
            .await?
            .map_or_else(|| taken.to_string(), |room| room.number);
        metrics::record_booking_conflict();
        tracing::info!(room_id = %taken, room = %room_number, "Room already held");
        Err(BookingError::RoomUnavailable {
            room_id: *taken,
            room_number,
        })
    }

    async fn compare_and_set(
        &self,
        expected: BookingStatus,
        entry: BookingHistory,
    ) -> Result<Booking> {
        let booking_id = entry.booking_id;
        let to = entry.new_status;
        let changed_by = entry.changed_by.clone();
        let updated = self
            .bookings
            .apply_transition(booking_id, expected, entry)
            .await
            .map_err(|err| match err {
                StoreError::StatusMismatch { actual, .. } => BookingError::InvalidTransition {
                    booking_id,
                    from: actual,
                    to,
                },
                StoreError::Missing(_) => BookingError::not_found("Booking", booking_id),
                other => BookingError::Store(other),
            })?;

        metrics::record_transition(to);
        tracing::info!(from = %expected, %to, %changed_by, "Booking status changed");
        Ok(updated)
    }

    async fn set_room_status(&self, room_ids: &[RoomId], status: RoomStatus) {
        for room_id in room_ids {
            if let Err(err) = self.catalog.set_room_status(*room_id, status).await {
                tracing::warn!(
                    %room_id,
                    %status,
                    error = %err,
                    "Failed to update room status"
                );
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Move a booking to `new_status`, appending one history row.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown booking
    /// - [`BookingError::InvalidInput`] if `changed_by` is blank
    /// - [`BookingError::InvalidTransition`] if the edge does not exist from
    ///   the booking's current status, including when a concurrent transition
    ///   changed it first
    /// - [`BookingError::RoomUnavailable`] when confirming under
    ///   [`HoldPolicy::ConfirmedOnly`] and another booking already holds a room
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(skip(self, reason), fields(booking_id = %booking_id, to = %new_status))]
    pub async fn transition(
        &self,
        booking_id: BookingId,
        new_status: BookingStatus,
        changed_by: &str,
        reason: Option<String>,
    ) -> Result<Booking> {
        let booking = self.get_booking(booking_id).await?;
        let Some(action) = BookingAction::transition(new_status, changed_by, reason) else {
            return Err(BookingError::InvalidTransition {
                booking_id,
                from: booking.status,
                to: new_status,
            });
        };
        self.dispatch(BookingState::with_booking(booking), action).await
    }

    /// PENDING → CONFIRMED
    ///
    /// # Errors
    ///
    /// See [`BookingManager::transition`].
    pub async fn confirm(&self, booking_id: BookingId, changed_by: &str) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::Confirmed, changed_by, None)
            .await
    }

    /// CONFIRMED → CHECKED_IN
    ///
    /// # Errors
    ///
    /// See [`BookingManager::transition`].
    pub async fn check_in(&self, booking_id: BookingId, changed_by: &str) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::CheckedIn, changed_by, None)
            .await
    }

    /// CHECKED_IN → CHECKED_OUT
    ///
    /// # Errors
    ///
    /// See [`BookingManager::transition`].
    pub async fn check_out(&self, booking_id: BookingId, changed_by: &str) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::CheckedOut, changed_by, None)
            .await
    }

    /// PENDING or CONFIRMED → CANCELLED
    ///
    /// # Errors
    ///
    /// See [`BookingManager::transition`].
    pub async fn cancel(
        &self,
        booking_id: BookingId,
        changed_by: &str,
        reason: Option<String>,
    ) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::Cancelled, changed_by, reason)
            .await
    }

    /// CONFIRMED → NO_SHOW
    ///
    /// # Errors
    ///
    /// See [`BookingManager::transition`].
    pub async fn mark_no_show(&self, booking_id: BookingId, changed_by: &str) -> Result<Booking> {
        self.transition(
            booking_id,
            BookingStatus::NoShow,
            changed_by,
            Some(NO_SHOW_REASON.to_string()),
        )
        .await
    }

    /// Mark every CONFIRMED booking of `hotel_id` whose check-in date is
    /// before `as_of` as NO_SHOW.
    ///
    /// Bookings that move on concurrently (for instance a late check-in) are
    /// skipped. Returns the bookings that were marked.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown hotel
    /// - [`BookingError::Store`] if a repository fails
    #[tracing::instrument(skip(self))]
    pub async fn sweep_no_shows(
        &self,
        hotel_id: HotelId,
        as_of: NaiveDate,
        changed_by: &str,
    ) -> Result<Vec<Booking>> {
        let overdue: Vec<BookingId> = self
            .bookings_for_hotel(hotel_id)
            .await?
            .into_iter()
            .filter(|booking| booking.status == BookingStatus::Confirmed && booking.check_in < as_of)
            .map(|booking| booking.id)
            .collect();

        let mut marked = Vec::with_capacity(overdue.len());
        for booking_id in overdue {
            match self.mark_no_show(booking_id, changed_by).await {
                Ok(booking) => marked.push(booking),
                Err(BookingError::InvalidTransition { from, .. }) => {
                    tracing::debug!(%booking_id, %from, "Skipped no-show, booking moved on");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(marked = marked.len(), "No-show sweep finished");
        Ok(marked)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Load a booking.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown id.
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<Booking> {
        self.bookings
            .booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found("Booking", booking_id))
    }

    /// Status history of a booking, oldest first.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown id.
    pub async fn history(&self, booking_id: BookingId) -> Result<Vec<BookingHistory>> {
        self.get_booking(booking_id).await?;
        Ok(self.bookings.history(booking_id).await?)
    }

    /// Bookings of a customer, oldest first.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown customer.
    pub async fn bookings_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Booking>> {
        self.customers.get_customer(customer_id).await?;
        Ok(self.bookings.bookings_for_customer(customer_id).await?)
    }

    /// Bookings of a hotel, oldest first.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotFound`] for an unknown hotel.
    pub async fn bookings_for_hotel(&self, hotel_id: HotelId) -> Result<Vec<Booking>> {
        if self.catalog.hotel(hotel_id).await?.is_none() {
            return Err(BookingError::not_found("Hotel", hotel_id));
        }
        Ok(self.bookings.bookings_for_hotel(hotel_id).await?)
    }
}

fn validate_room_list(room_ids: &[RoomId]) -> Result<()> {
    if room_ids.is_empty() {
        return Err(BookingError::invalid_input("at least one room is required"));
    }
    let mut seen = HashSet::with_capacity(room_ids.len());
    if let Some(repeated) = room_ids.iter().find(|room_id| !seen.insert(**room_id)) {
        return Err(BookingError::invalid_input(format!(
            "room {repeated} is listed more than once"
        )));
    }
    Ok(())
}
