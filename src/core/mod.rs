//! Core admission abstractions and capacity accounting.

pub mod admission;
pub mod audit;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod registry;
pub mod store;

pub use admission::AdmissionController;
pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink};
pub use error::{AppResult, ErrorKind, ReservationError, StoreError};
pub use lifecycle::ReservationManager;
pub use model::{EventCapacity, EventId, Outcome, Reservation, ReservationId, UserId};
pub use registry::{EventRegistry, UserRegistry};
pub use store::ReservationStore;
