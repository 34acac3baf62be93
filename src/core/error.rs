//! Error types for store and reservation operations.

use thiserror::Error;

use crate::core::model::{EventId, ReservationId, UserId};

/// Errors produced by reservation store backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The `(event, user)` pair already has a row.
    #[error("duplicate key")]
    DuplicateKey,
    /// The event already holds its maximum number of rows.
    #[error("capacity exceeded: {count}/{max}")]
    CapacityExceeded {
        /// Rows counted inside the atomic unit.
        count: u32,
        /// Capacity the unit was checked against.
        max: u32,
    },
    /// No reservation with the given id.
    #[error("reservation {0} not found")]
    NotFound(ReservationId),
    /// Transient backend failure (I/O, timeout). Safe to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Persisted state could not be decoded.
    #[error("corrupt store: {0}")]
    Corrupt(String),
}

/// Classification of reservation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced event, user or reservation does not exist, or the
    /// reference itself is invalid.
    Reference,
    /// Event is full.
    Capacity,
    /// Duplicate reservation.
    Conflict,
    /// Infrastructure failure.
    Storage,
}

/// Errors surfaced by the reservation lifecycle manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// Event id has no matching event.
    #[error("event {0} not found")]
    EventNotFound(EventId),
    /// User id has no matching user.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// Event has no free slot.
    #[error("event {0} has no slots available")]
    CapacityExceeded(EventId),
    /// User already holds a reservation for the event.
    #[error("user {1} already holds a reservation for event {0}")]
    AlreadyReserved(EventId, UserId),
    /// Reservation id has no matching reservation.
    #[error("reservation {0} not found")]
    ReservationNotFound(ReservationId),
    /// Event registration with zero capacity.
    #[error("invalid capacity: {0}")]
    InvalidCapacity(u32),
    /// Opaque storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ReservationError {
    /// Taxonomy bucket for this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EventNotFound(_)
            | Self::UserNotFound(_)
            | Self::ReservationNotFound(_)
            | Self::InvalidCapacity(_) => ErrorKind::Reference,
            Self::CapacityExceeded(_) => ErrorKind::Capacity,
            Self::AlreadyReserved(..) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether the same call may be transparently retried.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<StoreError> for ReservationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ReservationNotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
