//! In-memory reservation store with per-event serialization.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::core::model::{EventId, Reservation, ReservationId, UserId};
use crate::core::{ReservationStore, StoreError};
use crate::util::clock::now_ms_u64;

/// Number of shards in the id -> event index.
const INDEX_SHARDS: u64 = 64;

/// Rows held for a single event, guarded by that event's mutex.
#[derive(Debug, Default)]
struct EventSlots {
    /// Reservation rows keyed by id.
    rows: BTreeMap<ReservationId, Reservation>,
    /// Uniqueness index: user -> reservation id.
    holders: HashMap<UserId, ReservationId>,
}

impl EventSlots {
    fn count(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    fn put(&mut self, reservation: Reservation) {
        self.holders.insert(reservation.user_id, reservation.id);
        self.rows.insert(reservation.id, reservation);
    }

    fn take(&mut self, id: ReservationId) -> Option<Reservation> {
        let reservation = self.rows.remove(&id)?;
        self.holders.remove(&reservation.user_id);
        Some(reservation)
    }
}

/// In-memory reservation store.
///
/// Each event owns its own `parking_lot::Mutex`, so the count-check-insert
/// unit for one event never blocks admissions for another. The outer map is
/// only write-locked the first time an event is seen.
///
/// The id -> event index used by `get` and `delete_by_id` is sharded by id,
/// so admissions for different events rarely meet on the same index lock.
/// Lock order is always event slot, then index shard.
pub struct InMemoryReservationStore {
    next_id: AtomicU64,
    events: RwLock<HashMap<EventId, Arc<Mutex<EventSlots>>>>,
    index: Box<[RwLock<HashMap<ReservationId, EventId>>]>,
}

impl Default for InMemoryReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReservationStore {
    /// Create an empty store. The first assigned id is 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            events: RwLock::new(HashMap::new()),
            index: (0..INDEX_SHARDS)
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
        }
    }

    /// Total number of reservations across all events.
    pub fn len(&self) -> usize {
        self.index.iter().map(|shard| shard.read().len()).sum()
    }

    fn index_shard(&self, id: ReservationId) -> &RwLock<HashMap<ReservationId, EventId>> {
        let shard = usize::try_from(id % INDEX_SHARDS).unwrap_or_default();
        &self.index[shard]
    }

    fn event_of(&self, id: ReservationId) -> Option<EventId> {
        self.index_shard(id).read().get(&id).copied()
    }

    /// Whether the store holds no reservations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, event_id: EventId) -> Arc<Mutex<EventSlots>> {
        if let Some(slot) = self.events.read().get(&event_id) {
            return Arc::clone(slot);
        }
        let mut events = self.events.write();
        Arc::clone(events.entry(event_id).or_default())
    }

    fn existing_slot(&self, event_id: EventId) -> Option<Arc<Mutex<EventSlots>>> {
        self.events.read().get(&event_id).map(Arc::clone)
    }

    /// Insert under the event's lock, running `persist` before the row
    /// becomes visible. If `persist` fails nothing is applied.
    pub(crate) fn insert_guarded<F>(
        &self,
        event_id: EventId,
        user_id: UserId,
        max_participants: Option<u32>,
        persist: F,
    ) -> Result<Reservation, StoreError>
    where
        F: FnOnce(&Reservation) -> Result<(), StoreError>,
    {
        let slot = self.slot(event_id);
        let mut slots = slot.lock();

        // Duplicate check runs first so a holder retrying against a full
        // event still learns it already has a seat.
        if slots.holders.contains_key(&user_id) {
            return Err(StoreError::DuplicateKey);
        }
        let count = slots.count();
        if let Some(max) = max_participants {
            if count >= max {
                return Err(StoreError::CapacityExceeded { count, max });
            }
        }

        let id = self
            .next_id
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .map_err(|_| StoreError::Unavailable("reservation id space exhausted".into()))?;
        let reservation = Reservation {
            id,
            event_id,
            user_id,
            created_at_ms: now_ms_u64(),
        };
        persist(&reservation)?;

        slots.put(reservation);
        self.index_shard(id).write().insert(id, event_id);
        tracing::debug!(
            "event {} holds {} reservations after insert",
            event_id,
            count + 1
        );
        Ok(reservation)
    }

    /// Delete under the owning event's lock, running `persist` before the
    /// row disappears. If `persist` fails nothing is applied.
    pub(crate) fn delete_guarded<F>(
        &self,
        id: ReservationId,
        persist: F,
    ) -> Result<bool, StoreError>
    where
        F: FnOnce(&Reservation) -> Result<(), StoreError>,
    {
        let Some(event_id) = self.event_of(id) else {
            return Ok(false);
        };
        let Some(slot) = self.existing_slot(event_id) else {
            return Ok(false);
        };
        let mut slots = slot.lock();
        // A concurrent delete may have won between the index read and the lock.
        let Some(reservation) = slots.rows.get(&id).copied() else {
            return Ok(false);
        };
        persist(&reservation)?;

        slots.take(id);
        self.index_shard(id).write().remove(&id);
        Ok(true)
    }

    /// Re-insert a row read back from durable storage.
    pub(crate) fn restore(&self, reservation: Reservation) -> Result<(), StoreError> {
        self.bump_next_id(reservation.id)?;
        let slot = self.slot(reservation.event_id);
        let mut slots = slot.lock();
        if slots.holders.contains_key(&reservation.user_id) {
            return Err(StoreError::Corrupt(format!(
                "duplicate pair ({}, {}) in journal",
                reservation.event_id, reservation.user_id
            )));
        }
        let mut shard = self.index_shard(reservation.id).write();
        if shard.contains_key(&reservation.id) {
            return Err(StoreError::Corrupt(format!(
                "duplicate reservation id {} in journal",
                reservation.id
            )));
        }
        shard.insert(reservation.id, reservation.event_id);
        drop(shard);
        slots.put(reservation);
        Ok(())
    }

    /// Remove a row while replaying durable storage.
    pub(crate) fn forget(&self, id: ReservationId) {
        let event_id = self.index_shard(id).write().remove(&id);
        if let Some(slot) = event_id.and_then(|e| self.existing_slot(e)) {
            slot.lock().take(id);
        }
    }

    /// Advance the id counter so ids are never reused after replay.
    ///
    /// An id of `u64::MAX` leaves no successor and is reported as corrupt.
    pub(crate) fn bump_next_id(&self, seen: ReservationId) -> Result<(), StoreError> {
        let next = seen
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt(format!("reservation id {seen} out of range")))?;
        self.next_id.fetch_max(next, Ordering::AcqRel);
        Ok(())
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn count_for_event(&self, event_id: EventId) -> Result<u32, StoreError> {
        Ok(self
            .existing_slot(event_id)
            .map_or(0, |slot| slot.lock().count()))
    }

    fn exists_pair(&self, event_id: EventId, user_id: UserId) -> Result<bool, StoreError> {
        Ok(self
            .existing_slot(event_id)
            .is_some_and(|slot| slot.lock().holders.contains_key(&user_id)))
    }

    fn insert(&self, event_id: EventId, user_id: UserId) -> Result<Reservation, StoreError> {
        self.insert_guarded(event_id, user_id, None, |_| Ok(()))
    }

    fn insert_within_capacity(
        &self,
        event_id: EventId,
        user_id: UserId,
        max_participants: u32,
    ) -> Result<Reservation, StoreError> {
        self.insert_guarded(event_id, user_id, Some(max_participants), |_| Ok(()))
    }

    fn delete_by_id(&self, id: ReservationId) -> Result<bool, StoreError> {
        self.delete_guarded(id, |_| Ok(()))
    }

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        let Some(event_id) = self.event_of(id) else {
            return Ok(None);
        };
        Ok(self
            .existing_slot(event_id)
            .and_then(|slot| slot.lock().rows.get(&id).copied()))
    }

    fn list_for_event(&self, event_id: EventId) -> Result<Vec<Reservation>, StoreError> {
        Ok(self
            .existing_slot(event_id)
            .map(|slot| slot.lock().rows.values().copied().collect())
            .unwrap_or_default())
    }
}
