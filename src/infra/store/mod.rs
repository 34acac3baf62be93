//! Reservation store backends.

pub mod journal;
pub mod memory;

pub use journal::JournalReservationStore;
pub use memory::InMemoryReservationStore;
