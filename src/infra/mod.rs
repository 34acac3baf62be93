//! Infrastructure adapters for reservation stores and registries.

pub mod registry;
pub mod store;

pub use registry::{InMemoryEventRegistry, InMemoryUserRegistry};
pub use store::{InMemoryReservationStore, JournalReservationStore};
