//! Reservation store abstraction.

use crate::core::model::{EventId, Reservation, ReservationId, UserId};
use crate::core::StoreError;

/// Abstraction for reservation store backends.
///
/// Implementations own every reservation row and enforce `(event, user)`
/// uniqueness themselves. All methods take `&self`; backends serialize
/// writers per event internally so callers for different events never
/// contend on a shared lock.
pub trait ReservationStore: Send + Sync {
    /// Number of reservations currently held for an event.
    fn count_for_event(&self, event_id: EventId) -> Result<u32, StoreError>;

    /// Whether the user holds a reservation for the event.
    fn exists_pair(&self, event_id: EventId, user_id: UserId) -> Result<bool, StoreError>;

    /// Insert a row for the pair with no capacity bound.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if the pair exists, including
    /// when two calls for the same pair race.
    fn insert(&self, event_id: EventId, user_id: UserId) -> Result<Reservation, StoreError>;

    /// Count, check and insert as one atomic unit for the event.
    ///
    /// No other insert or delete for `event_id` can interleave between the
    /// count and the write. Fails with [`StoreError::CapacityExceeded`] when
    /// the event already holds `max_participants` rows and with
    /// [`StoreError::DuplicateKey`] when the pair exists. On any error no row
    /// is left behind.
    fn insert_within_capacity(
        &self,
        event_id: EventId,
        user_id: UserId,
        max_participants: u32,
    ) -> Result<Reservation, StoreError>;

    /// Remove a reservation. Returns `true` if a row was removed.
    fn delete_by_id(&self, id: ReservationId) -> Result<bool, StoreError>;

    /// Fetch a reservation by id.
    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError>;

    /// All reservations for an event, ordered by id.
    fn list_for_event(&self, event_id: EventId) -> Result<Vec<Reservation>, StoreError>;
}

impl<S: ReservationStore + ?Sized> ReservationStore for std::sync::Arc<S> {
    fn count_for_event(&self, event_id: EventId) -> Result<u32, StoreError> {
        (**self).count_for_event(event_id)
    }

    fn exists_pair(&self, event_id: EventId, user_id: UserId) -> Result<bool, StoreError> {
        (**self).exists_pair(event_id, user_id)
    }

    fn insert(&self, event_id: EventId, user_id: UserId) -> Result<Reservation, StoreError> {
        (**self).insert(event_id, user_id)
    }

    fn insert_within_capacity(
        &self,
        event_id: EventId,
        user_id: UserId,
        max_participants: u32,
    ) -> Result<Reservation, StoreError> {
        (**self).insert_within_capacity(event_id, user_id, max_participants)
    }

    fn delete_by_id(&self, id: ReservationId) -> Result<bool, StoreError> {
        (**self).delete_by_id(id)
    }

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        (**self).get(id)
    }

    fn list_for_event(&self, event_id: EventId) -> Result<Vec<Reservation>, StoreError> {
        (**self).list_for_event(event_id)
    }
}
