//! In-memory event and user registries for development and testing.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::model::{EventCapacity, EventId, UserId};
use crate::core::{EventRegistry, ReservationError, StoreError, UserRegistry};

/// Event registry backed by a hash map.
#[derive(Default)]
pub struct InMemoryEventRegistry {
    events: RwLock<HashMap<EventId, EventCapacity>>,
}

impl InMemoryEventRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event. Capacity is fixed once registered; registering the
    /// same id again is ignored and returns the existing descriptor.
    pub fn register(
        &self,
        event_id: EventId,
        max_participants: u32,
    ) -> Result<EventCapacity, ReservationError> {
        if max_participants == 0 {
            return Err(ReservationError::InvalidCapacity(max_participants));
        }
        let mut events = self.events.write();
        let descriptor = *events.entry(event_id).or_insert(EventCapacity {
            event_id,
            max_participants,
        });
        Ok(descriptor)
    }

    /// Remove an event from the registry.
    pub fn remove(&self, event_id: EventId) -> bool {
        self.events.write().remove(&event_id).is_some()
    }
}

#[async_trait]
impl EventRegistry for InMemoryEventRegistry {
    async fn lookup(&self, event_id: EventId) -> Result<Option<EventCapacity>, StoreError> {
        Ok(self.events.read().get(&event_id).copied())
    }
}

/// User registry backed by a hash set.
#[derive(Default)]
pub struct InMemoryUserRegistry {
    users: RwLock<HashSet<UserId>>,
}

impl InMemoryUserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given users.
    pub fn with_users(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    /// Add a user. Returns `false` if already present.
    pub fn register(&self, user_id: UserId) -> bool {
        self.users.write().insert(user_id)
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    async fn exists(&self, user_id: UserId) -> Result<bool, StoreError> {
        Ok(self.users.read().contains(&user_id))
    }
}
