//! Identifiers and records shared by the store, the registries and the controller.

use serde::{Deserialize, Serialize};

/// Identifier of an event owned by the external event registry.
pub type EventId = u64;
/// Identifier of a user owned by the external user registry.
pub type UserId = u64;
/// Store-assigned reservation identifier. Monotonic and never reused.
pub type ReservationId = u64;

/// Read-only view of an event's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCapacity {
    /// Event identifier.
    pub event_id: EventId,
    /// Maximum number of reservations the event accepts. Always at least 1.
    pub max_participants: u32,
}

/// A committed reservation. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reservation {
    /// Store-assigned identifier.
    pub id: ReservationId,
    /// Reserved event.
    pub event_id: EventId,
    /// Holder of the reservation.
    pub user_id: UserId,
    /// Commit timestamp in milliseconds since epoch.
    pub created_at_ms: u64,
}

/// Result of a single admission decision.
///
/// Capacity and duplicate rejections are ordinary business outcomes, so they
/// live here rather than in an error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The reservation was created.
    Admitted(Reservation),
    /// No event with the requested id.
    EventNotFound,
    /// No user with the requested id.
    UserNotFound,
    /// The event already holds `max_participants` reservations.
    CapacityExceeded,
    /// The user already holds a reservation for this event.
    AlreadyReserved,
}

impl Outcome {
    /// Short action label used for audit records and logs.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Admitted(_) => "admit",
            Self::EventNotFound => "reject_event",
            Self::UserNotFound => "reject_user",
            Self::CapacityExceeded => "reject_capacity",
            Self::AlreadyReserved => "reject_duplicate",
        }
    }

    /// Returns the reservation when admitted.
    pub const fn reservation(&self) -> Option<&Reservation> {
        match self {
            Self::Admitted(r) => Some(r),
            _ => None,
        }
    }
}
