//! Booking lifecycle reducer.
//!
//! Every change to a booking goes through [`BookingReducer`]: the caller
//! loads the booking into a [`BookingState`], dispatches a [`BookingAction`],
//! and gets back the updated state plus the [`BookingEffect`]s that make the
//! change durable. The reducer never touches storage or locks; it guards the
//! state machine, stamps the history row and describes the work.
//!
//! Effects are returned in execution order. A runtime must stop at the first
//! effect that fails and run none of the rest.

use crate::calendar::StayPeriod;
use crate::environment::Clock;
use crate::error::BookingError;
use crate::reducer::Reducer;
use crate::status::{BookingStatus, HoldPolicy};
use crate::types::{
    Booking, BookingHistory, BookingId, BookingRoom, CustomerId, HotelId, Money, RoomId,
    RoomStatus,
};
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

/// Actor recorded on the creation history row.
pub const CREATED_BY: &str = "booking-desk";

/// Reason recorded when a booking is marked as no-show by the cutoff sweep.
pub const NO_SHOW_REASON: &str = "no-show cutoff";

// ============================================================================
// State
// ============================================================================

/// The booking a reducer step operates on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingState {
    /// The booking, absent before creation
    pub booking: Option<Booking>,
    /// Why the last action was rejected, if it was
    pub last_error: Option<BookingError>,
}

impl BookingState {
    /// State with no booking yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State for an existing booking
    #[must_use]
    pub const fn with_booking(booking: Booking) -> Self {
        Self {
            booking: Some(booking),
            last_error: None,
        }
    }

    /// Status of the booking, if there is one
    #[must_use]
    pub fn status(&self) -> Option<BookingStatus> {
        self.booking.as_ref().map(|booking| booking.status)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Commands accepted by the booking lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    /// Reserve priced rooms, producing a PENDING booking
    Create {
        /// Id for the new booking
        booking_id: BookingId,
        /// Resolved customer
        customer_id: CustomerId,
        /// Hotel the rooms belong to
        hotel_id: HotelId,
        /// Validated stay
        period: StayPeriod,
        /// Party size
        guests: u32,
        /// Rooms with their price for the whole stay
        rooms: Vec<(RoomId, Money)>,
    },
    /// PENDING → CONFIRMED
    Confirm {
        /// Staff member
        changed_by: String,
        /// Optional note
        reason: Option<String>,
    },
    /// CONFIRMED → CHECKED_IN
    CheckIn {
        /// Staff member
        changed_by: String,
        /// Optional note
        reason: Option<String>,
    },
    /// CHECKED_IN → CHECKED_OUT
    CheckOut {
        /// Staff member
        changed_by: String,
        /// Optional note
        reason: Option<String>,
    },
    /// PENDING or CONFIRMED → CANCELLED
    Cancel {
        /// Staff member
        changed_by: String,
        /// Optional note
        reason: Option<String>,
    },
    /// CONFIRMED → NO_SHOW
    NoShow {
        /// Staff member or sweep actor
        changed_by: String,
        /// Optional note
        reason: Option<String>,
    },
}

impl BookingAction {
    /// The action that moves a booking to `to`.
    ///
    /// Returns `None` for PENDING, which only creation produces.
    #[must_use]
    pub fn transition(
        to: BookingStatus,
        changed_by: impl Into<String>,
        reason: Option<String>,
    ) -> Option<Self> {
        let changed_by = changed_by.into();
        match to {
            BookingStatus::Pending => None,
            BookingStatus::Confirmed => Some(Self::Confirm { changed_by, reason }),
            BookingStatus::CheckedIn => Some(Self::CheckIn { changed_by, reason }),
            BookingStatus::CheckedOut => Some(Self::CheckOut { changed_by, reason }),
            BookingStatus::Cancelled => Some(Self::Cancel { changed_by, reason }),
            BookingStatus::NoShow => Some(Self::NoShow { changed_by, reason }),
        }
    }

    /// Status the booking has after this action succeeds
    #[must_use]
    pub const fn target_status(&self) -> BookingStatus {
        match self {
            Self::Create { .. } => BookingStatus::Pending,
            Self::Confirm { .. } => BookingStatus::Confirmed,
            Self::CheckIn { .. } => BookingStatus::CheckedIn,
            Self::CheckOut { .. } => BookingStatus::CheckedOut,
            Self::Cancel { .. } => BookingStatus::Cancelled,
            Self::NoShow { .. } => BookingStatus::NoShow,
        }
    }
}

// ============================================================================
// Effects
// ============================================================================

/// Work a runtime performs to make a reducer step durable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingEffect {
    /// Take the per-room locks; they stay held until every later effect ran
    LockRooms {
        /// Rooms to lock
        room_ids: SmallVec<[RoomId; 2]>,
    },
    /// Fail with `RoomUnavailable` if a blocking booking other than
    /// `exclude` overlaps `period` on any of the rooms
    EnsureRoomsFree {
        /// Rooms to check
        room_ids: SmallVec<[RoomId; 2]>,
        /// Stay to check
        period: StayPeriod,
        /// The booking being confirmed, which must not conflict with itself
        exclude: Option<BookingId>,
    },
    /// Store a new booking with its creation history row
    Insert {
        /// The booking
        booking: Booking,
        /// Its `— → PENDING` row
        created: BookingHistory,
    },
    /// Write `entry.new_status` if the stored status is still `expected`,
    /// appending `entry`
    CompareAndSet {
        /// Status the step was computed from
        expected: BookingStatus,
        /// The history row to append
        entry: BookingHistory,
    },
    /// Set the operations status of the booking's rooms
    SetRoomStatus {
        /// Rooms to update
        room_ids: SmallVec<[RoomId; 2]>,
        /// New room status
        status: RoomStatus,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Dependencies of the booking reducer.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for creation and history timestamps
    pub clock: Arc<dyn Clock>,
    /// Which statuses block rooms
    pub policy: HoldPolicy,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, policy: HoldPolicy) -> Self {
        Self { clock, policy }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Pure booking lifecycle logic.
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    fn create(
        state: &mut BookingState,
        booking_id: BookingId,
        customer_id: CustomerId,
        hotel_id: HotelId,
        period: StayPeriod,
        guests: u32,
        rooms: &[(RoomId, Money)],
        env: &BookingEnvironment,
    ) -> Result<SmallVec<[BookingEffect; 4]>, BookingError> {
        if let Some(existing) = &state.booking {
            return Err(BookingError::invalid_input(format!(
                "booking {} already exists",
                existing.id
            )));
        }
        if rooms.is_empty() {
            return Err(BookingError::invalid_input("at least one room is required"));
        }
        if guests == 0 {
            return Err(BookingError::invalid_input("guests must be at least 1"));
        }
        let total_cost = rooms
            .iter()
            .try_fold(Money::ZERO, |sum, (_, price)| sum.checked_add(*price))
            .ok_or_else(|| BookingError::invalid_input("booking total overflows"))?;

        let now = env.clock.now();
        let booking = Booking {
            id: booking_id,
            customer_id,
            hotel_id,
            check_in: period.check_in(),
            check_out: period.check_out(),
            guests,
            total_cost,
            status: BookingStatus::Pending,
            rooms: rooms
                .iter()
                .map(|(room_id, price)| BookingRoom {
                    booking_id,
                    room_id: *room_id,
                    price: *price,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };
        let created = BookingHistory::new(booking_id, None, booking.status, CREATED_BY, now, None);
        let room_ids: SmallVec<[RoomId; 2]> = booking.room_ids().collect();
        state.booking = Some(booking.clone());

        Ok(smallvec![
            BookingEffect::LockRooms {
                room_ids: room_ids.clone(),
            },
            BookingEffect::EnsureRoomsFree {
                room_ids,
                period,
                exclude: None,
            },
            BookingEffect::Insert { booking, created },
        ])
    }

    fn transition(
        state: &mut BookingState,
        to: BookingStatus,
        changed_by: &str,
        reason: Option<String>,
        env: &BookingEnvironment,
    ) -> Result<SmallVec<[BookingEffect; 4]>, BookingError> {
        let changed_by = changed_by.trim();
        if changed_by.is_empty() {
            return Err(BookingError::invalid_input("changed_by is required"));
        }
        let Some(booking) = state.booking.as_mut() else {
            return Err(BookingError::invalid_input("no booking loaded"));
        };
        let from = booking.status;
        if !from.can_transition_to(to) {
            return Err(BookingError::InvalidTransition {
                booking_id: booking.id,
                from,
                to,
            });
        }

        let now = env.clock.now();
        let entry = BookingHistory::new(booking.id, Some(from), to, changed_by, now, reason);
        booking.status = to;
        booking.updated_at = now;

        let room_ids: SmallVec<[RoomId; 2]> = booking.room_ids().collect();
        let mut effects = SmallVec::new();
        match to {
            BookingStatus::Confirmed if env.policy.rechecks_on_confirm() => {
                effects.push(BookingEffect::LockRooms {
                    room_ids: room_ids.clone(),
                });
                effects.push(BookingEffect::EnsureRoomsFree {
                    room_ids,
                    period: booking.period(),
                    exclude: Some(booking.id),
                });
                effects.push(BookingEffect::CompareAndSet {
                    expected: from,
                    entry,
                });
            }
            BookingStatus::CheckedIn | BookingStatus::CheckedOut => {
                let status = if to == BookingStatus::CheckedIn {
                    RoomStatus::Occupied
                } else {
                    RoomStatus::Cleaning
                };
                // The lock spans the status write so a same-day turnover
                // lands in commit order.
                effects.push(BookingEffect::LockRooms {
                    room_ids: room_ids.clone(),
                });
                effects.push(BookingEffect::CompareAndSet {
                    expected: from,
                    entry,
                });
                effects.push(BookingEffect::SetRoomStatus { room_ids, status });
            }
            _ => effects.push(BookingEffect::CompareAndSet {
                expected: from,
                entry,
            }),
        }
        Ok(effects)
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;
    type Effect = BookingEffect;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Self::Effect; 4]> {
        state.last_error = None;
        let to = action.target_status();
        let outcome = match action {
            BookingAction::Create {
                booking_id,
                customer_id,
                hotel_id,
                period,
                guests,
                rooms,
            } => Self::create(
                state,
                booking_id,
                customer_id,
                hotel_id,
                period,
                guests,
                &rooms,
                env,
            ),
            BookingAction::Confirm { changed_by, reason }
            | BookingAction::CheckIn { changed_by, reason }
            | BookingAction::CheckOut { changed_by, reason }
            | BookingAction::Cancel { changed_by, reason }
            | BookingAction::NoShow { changed_by, reason } => {
                Self::transition(state, to, &changed_by, reason, env)
            }
        };

        match outcome {
            Ok(effects) => effects,
            Err(error) => {
                state.last_error = Some(error);
                SmallVec::new()
            }
        }
    }
}
