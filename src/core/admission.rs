//! Admission controller: the accept/reject decision for one reservation request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::model::{EventCapacity, EventId, Outcome, ReservationId, UserId};
use crate::core::{build_audit_event, AuditSink, EventRegistry, ReservationStore, StoreError, UserRegistry};

/// Decision engine for reservation requests.
///
/// Registry lookups happen first and outside any store lock. The capacity
/// count and the insert then run as a single per-event atomic unit inside the
/// store, so the count is never cached across calls and never stale.
pub struct AdmissionController<E, U, S> {
    events: E,
    users: U,
    store: S,
    lookup_timeout: Option<Duration>,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<E, U, S> AdmissionController<E, U, S>
where
    E: EventRegistry,
    U: UserRegistry,
    S: ReservationStore,
{
    /// Create a controller from its collaborators.
    pub const fn new(events: E, users: U, store: S) -> Self {
        Self {
            events,
            users,
            store,
            lookup_timeout: None,
            audit: None,
        }
    }

    /// Bound each registry lookup. An elapsed lookup is a storage error.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Underlying reservation store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Underlying event registry.
    pub const fn events(&self) -> &E {
        &self.events
    }

    /// Decide whether `user_id` may reserve a slot on `event_id`, creating the
    /// reservation when it may.
    ///
    /// Capacity and duplicate rejections are returned as [`Outcome`] values.
    /// Only infrastructure failures are errors; they are safe to retry since
    /// a retry after an unobserved commit reports [`Outcome::AlreadyReserved`].
    #[tracing::instrument(skip(self))]
    pub async fn admit(&self, event_id: EventId, user_id: UserId) -> Result<Outcome, StoreError> {
        let Some(capacity) = self.lookup_event(event_id).await? else {
            tracing::warn!("event {} not found", event_id);
            return Ok(self.decided(event_id, user_id, Outcome::EventNotFound));
        };

        if !self.bounded(self.users.exists(user_id)).await? {
            tracing::warn!("user {} not found", user_id);
            return Ok(self.decided(event_id, user_id, Outcome::UserNotFound));
        }

        let outcome = match self.store.insert_within_capacity(
            event_id,
            user_id,
            capacity.max_participants,
        ) {
            Ok(reservation) => {
                tracing::info!(
                    "admitted user {} to event {} as reservation {}",
                    user_id,
                    event_id,
                    reservation.id
                );
                Outcome::Admitted(reservation)
            }
            Err(StoreError::CapacityExceeded { count, max }) => {
                tracing::warn!("event {} full ({}/{})", event_id, count, max);
                Outcome::CapacityExceeded
            }
            Err(StoreError::DuplicateKey) => {
                tracing::warn!("user {} already holds event {}", user_id, event_id);
                Outcome::AlreadyReserved
            }
            Err(e) => {
                tracing::error!("admission for event {} failed: {}", event_id, e);
                return Err(e);
            }
        };
        Ok(self.decided(event_id, user_id, outcome))
    }

    /// Look an event up through the registry, bounded by the lookup timeout.
    pub(crate) async fn lookup_event(
        &self,
        event_id: EventId,
    ) -> Result<Option<EventCapacity>, StoreError> {
        self.bounded(self.events.lookup(event_id)).await
    }

    fn decided(&self, event_id: EventId, user_id: UserId, outcome: Outcome) -> Outcome {
        self.record_audit(
            outcome.reservation().map(|r| r.id),
            event_id,
            user_id,
            outcome.action(),
        );
        outcome
    }

    /// Record an audit event (sync operation with parking_lot mutex).
    pub(crate) fn record_audit(
        &self,
        reservation_id: Option<ReservationId>,
        event_id: EventId,
        user_id: UserId,
        action: &str,
    ) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            sink.record(build_audit_event(
                reservation_id,
                event_id,
                user_id,
                action,
                None,
            ));
        }
    }

    #[cfg(feature = "tokio-runtime")]
    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match self.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                StoreError::Unavailable(format!("registry lookup timed out after {limit:?}"))
            })?,
            None => fut.await,
        }
    }

    #[cfg(not(feature = "tokio-runtime"))]
    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        fut.await
    }
}
