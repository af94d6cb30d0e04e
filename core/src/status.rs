//! Booking status state machine and hold policy.
//!
//! ```text
//!            confirm            check-in             check-out
//! PENDING ───────────▶ CONFIRMED ──────────▶ CHECKED_IN ──────────▶ CHECKED_OUT
//!    │                   │   │
//!    │ cancel     cancel │   │ no-show cutoff
//!    ▼                   ▼   ▼
//! CANCELLED ◀────────────┘  NO_SHOW
//! ```
//!
//! Only the edges drawn above exist. CANCELLED, NO_SHOW and CHECKED_OUT are
//! terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created, awaiting confirmation
    Pending,
    /// Confirmed by the front desk
    Confirmed,
    /// Guest is in house
    CheckedIn,
    /// Guest has left
    CheckedOut,
    /// Cancelled before arrival
    Cancelled,
    /// Guest never arrived
    NoShow,
}

impl BookingStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// Statuses reachable in one step from `self`
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::CheckedIn, Self::Cancelled, Self::NoShow],
            Self::CheckedIn => &[Self::CheckedOut],
            Self::CheckedOut | Self::Cancelled | Self::NoShow => &[],
        }
    }

    /// Whether `self → next` is an edge of the state machine
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled | Self::NoShow)
    }

    /// Whether bookings in this status count toward revenue
    #[must_use]
    pub const fn counts_toward_revenue(self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn | Self::CheckedOut)
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

impl FromStr for BookingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseStatusError {
                kind: "booking status",
                value: s.to_string(),
            })
    }
}

/// Which booking statuses block a room for availability.
///
/// Under `PendingHolds` a freshly created booking takes the room immediately,
/// so concurrent requests for the same room cannot both succeed. Under
/// `ConfirmedOnly` a pending booking is a soft hold: the room stays on offer
/// until confirmation, and confirmation re-checks for conflicts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoldPolicy {
    /// PENDING, CONFIRMED and CHECKED_IN block
    #[default]
    PendingHolds,
    /// Only CONFIRMED and CHECKED_IN block
    ConfirmedOnly,
}

impl HoldPolicy {
    /// Statuses that block a room under this policy
    #[must_use]
    pub const fn blocking_statuses(self) -> &'static [BookingStatus] {
        match self {
            Self::PendingHolds => &[
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::CheckedIn,
            ],
            Self::ConfirmedOnly => &[BookingStatus::Confirmed, BookingStatus::CheckedIn],
        }
    }

    /// Whether a booking in `status` blocks its rooms
    #[must_use]
    pub fn blocks(self, status: BookingStatus) -> bool {
        self.blocking_statuses().contains(&status)
    }

    /// Whether confirming a booking must re-check room conflicts
    #[must_use]
    pub const fn rechecks_on_confirm(self) -> bool {
        matches!(self, Self::ConfirmedOnly)
    }
}

impl FromStr for HoldPolicy {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pending-holds" => Ok(Self::PendingHolds),
            "confirmed-only" => Ok(Self::ConfirmedOnly),
            _ => Err(ParseStatusError {
                kind: "hold policy",
                value: s.to_string(),
            }),
        }
    }
}
