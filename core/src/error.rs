//! Error taxonomy for the booking engine.
//!
//! Every failure a caller can act on has its own variant so the front desk
//! can tell "that room was just taken, pick another" apart from "the request
//! itself is wrong". Nothing here is retried automatically.

use crate::status::BookingStatus;
use crate::types::{BookingId, RoomId};
use std::fmt;
use thiserror::Error;

/// Result type for booking operations
pub type Result<T> = std::result::Result<T, BookingError>;

/// Errors raised by repository implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Compare-and-set on a booking status lost a race.
    #[error("Status mismatch: expected {expected}, found {actual}")]
    StatusMismatch {
        /// The status the writer read before deciding.
        expected: BookingStatus,
        /// The status actually stored.
        actual: BookingStatus,
    },

    /// A record with the same key already exists.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// A record the write depends on does not exist.
    #[error("Record not found: {0}")]
    Missing(String),

    /// Backend failure (connection, poisoning, I/O).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors returned by the booking engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Bad dates, empty room list, capacity or overflow problems.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another booking holds the room for an overlapping stay.
    #[error("Room {room_number} is no longer available for the requested dates")]
    RoomUnavailable {
        /// The conflicting room.
        room_id: RoomId,
        /// Its door number, for display.
        room_number: String,
    },

    /// The requested status change is not an edge of the state machine.
    #[error("Booking {booking_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The booking.
        booking_id: BookingId,
        /// Its status when the change was attempted.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },

    /// Unknown booking, customer, hotel or room.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`BookingError`] for callers and transports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was malformed.
    InvalidInput,
    /// A room was taken by a concurrent booking.
    RoomUnavailable,
    /// The state machine rejected the change.
    InvalidTransition,
    /// A referenced record does not exist.
    NotFound,
    /// Storage failure.
    Internal,
}

impl BookingError {
    /// Creates an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::RoomUnavailable { .. } => ErrorKind::RoomUnavailable,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BookingError::not_found("Booking", "42");
        assert_eq!(err.to_string(), "Booking with id 42 not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_room_unavailable_names_room() {
        let err = BookingError::RoomUnavailable {
            room_id: RoomId::new(),
            room_number: "301".to_string(),
        };
        assert!(err.to_string().contains("301"));
        assert_eq!(err.kind(), ErrorKind::RoomUnavailable);
    }

    #[test]
    fn test_store_errors_are_internal() {
        let err: BookingError = StoreError::Backend("lock poisoned".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
