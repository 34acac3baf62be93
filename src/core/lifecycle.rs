//! Reservation lifecycle manager: create, read, list and delete.

use crate::core::model::{EventId, Outcome, Reservation, ReservationId, UserId};
use crate::core::{AdmissionController, EventRegistry, ReservationError, ReservationStore, UserRegistry};

/// Collaborator-facing entry point for reservations.
///
/// Wraps the [`AdmissionController`] and turns its outcomes into
/// [`ReservationError`] values the outer layer can map to statuses.
pub struct ReservationManager<E, U, S> {
    controller: AdmissionController<E, U, S>,
}

impl<E, U, S> ReservationManager<E, U, S>
where
    E: EventRegistry,
    U: UserRegistry,
    S: ReservationStore,
{
    /// Create a manager around a configured controller.
    pub const fn new(controller: AdmissionController<E, U, S>) -> Self {
        Self { controller }
    }

    /// Underlying admission controller.
    pub const fn controller(&self) -> &AdmissionController<E, U, S> {
        &self.controller
    }

    /// Reserve a slot on `event_id` for `user_id`.
    pub async fn create(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Reservation, ReservationError> {
        match self.controller.admit(event_id, user_id).await? {
            Outcome::Admitted(reservation) => Ok(reservation),
            Outcome::EventNotFound => Err(ReservationError::EventNotFound(event_id)),
            Outcome::UserNotFound => Err(ReservationError::UserNotFound(user_id)),
            Outcome::CapacityExceeded => Err(ReservationError::CapacityExceeded(event_id)),
            Outcome::AlreadyReserved => Err(ReservationError::AlreadyReserved(event_id, user_id)),
        }
    }

    /// Fetch a reservation by id.
    pub fn get_by_id(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        self.controller
            .store()
            .get(id)?
            .ok_or(ReservationError::ReservationNotFound(id))
    }

    /// Delete a reservation, freeing one slot on its event.
    ///
    /// The slot is visible to the next admission for that event as soon as
    /// this returns.
    pub fn delete_by_id(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        let store = self.controller.store();
        let reservation = store
            .get(id)?
            .ok_or(ReservationError::ReservationNotFound(id))?;
        if !store.delete_by_id(id)? {
            // Lost a race with another delete of the same id.
            return Err(ReservationError::ReservationNotFound(id));
        }
        tracing::info!(
            "deleted reservation {} (event {}, user {})",
            id,
            reservation.event_id,
            reservation.user_id
        );
        self.controller
            .record_audit(Some(id), reservation.event_id, reservation.user_id, "delete");
        Ok(reservation)
    }

    /// Reservations held for an event, ordered by id.
    pub async fn list_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Reservation>, ReservationError> {
        if self.controller.lookup_event(event_id).await?.is_none() {
            return Err(ReservationError::EventNotFound(event_id));
        }
        Ok(self.controller.store().list_for_event(event_id)?)
    }

    /// Number of reservations held for an event.
    pub fn count_for_event(&self, event_id: EventId) -> Result<u32, ReservationError> {
        Ok(self.controller.store().count_for_event(event_id)?)
    }
}
