//! Collaborator interfaces for the event and user registries.
//!
//! Both registries are owned outside this crate (they usually front a
//! database), so lookups are async.

use async_trait::async_trait;

use crate::core::model::{EventCapacity, EventId, UserId};
use crate::core::StoreError;

/// Source of event capacity descriptors.
#[async_trait]
pub trait EventRegistry: Send + Sync {
    /// Capacity of the event, or `None` if no such event exists.
    ///
    /// The returned `max_participants` must be fixed for the event's lifetime.
    async fn lookup(&self, event_id: EventId) -> Result<Option<EventCapacity>, StoreError>;
}

/// Source of user existence checks.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Whether a user with the id exists.
    async fn exists(&self, user_id: UserId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<R: EventRegistry + ?Sized> EventRegistry for std::sync::Arc<R> {
    async fn lookup(&self, event_id: EventId) -> Result<Option<EventCapacity>, StoreError> {
        (**self).lookup(event_id).await
    }
}

#[async_trait]
impl<R: UserRegistry + ?Sized> UserRegistry for std::sync::Arc<R> {
    async fn exists(&self, user_id: UserId) -> Result<bool, StoreError> {
        (**self).exists(user_id).await
    }
}
