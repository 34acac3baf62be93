//! Registry backends.

pub mod memory;

pub use memory::{InMemoryEventRegistry, InMemoryUserRegistry};
