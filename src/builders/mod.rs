//! Builders to construct the reservation manager from configuration.

pub mod manager_builder;

pub use manager_builder::{build_manager, build_store, BuiltManager, SharedStore};
