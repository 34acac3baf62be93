//! Configuration models for admission and store backends.

pub mod admission;

pub use admission::{AdmissionConfig, StoreBackendConfig};
