//! # Prometheus Reservations
//!
//! Capacity-bounded reservation admission for events.
//!
//! Many clients may ask for a seat on the same event at the same time. This
//! crate decides each request atomically so that an event never holds more
//! reservations than its `max_participants`, a user never holds two
//! reservations for the same event, and every caller gets a definite
//! admitted / rejected answer even under contention.
//!
//! ## Components
//!
//! - **Event and user registries** ([`core::EventRegistry`], [`core::UserRegistry`]):
//!   external collaborators answering "does it exist, and how big is it".
//! - **Reservation store** ([`core::ReservationStore`]): owns the rows, enforces
//!   pair uniqueness, and runs count + insert as one per-event atomic unit.
//! - **Admission controller** ([`core::AdmissionController`]): turns a request into
//!   an [`core::Outcome`].
//! - **Lifecycle manager** ([`core::ReservationManager`]): create / get / list /
//!   delete with typed errors for the transport layer.
//!
//! ## Concurrency
//!
//! Stores serialize writers per event. Admissions for different events never
//! block each other; an admission and a delete on the same event are mutually
//! exclusive with respect to the count.
//!
//! ```rust,ignore
//! use prometheus_reservations::core::{AdmissionController, ReservationManager};
//! use prometheus_reservations::infra::{
//!     InMemoryEventRegistry, InMemoryReservationStore, InMemoryUserRegistry,
//! };
//!
//! let events = InMemoryEventRegistry::new();
//! events.register(1, 2)?;
//! let users = InMemoryUserRegistry::with_users([10, 11, 12]);
//!
//! let manager = ReservationManager::new(AdmissionController::new(
//!     events,
//!     users,
//!     InMemoryReservationStore::new(),
//! ));
//!
//! manager.create(1, 10).await?;
//! manager.create(1, 11).await?;
//! assert!(manager.create(1, 12).await.is_err()); // full
//! ```
//!
//! For complete examples, see `tests/admission_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission abstractions and capacity accounting.
pub mod core;
/// Configuration models for admission and store backends.
pub mod config;
/// Builders to construct the reservation manager from configuration.
pub mod builders;
/// Infrastructure adapters for stores and registries.
pub mod infra;
/// Request/response models for the transport layer.
pub mod runtime;
/// Shared utilities.
pub mod util;
