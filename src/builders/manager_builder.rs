//! Builds a [`ReservationManager`] from an [`AdmissionConfig`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{AdmissionConfig, StoreBackendConfig};
use crate::core::{
    AdmissionController, AppResult, EventRegistry, InMemoryAuditSink, ReservationManager,
    ReservationStore, TracingAuditSink, UserRegistry,
};
use crate::infra::{InMemoryReservationStore, JournalReservationStore};

/// Store handle selected at runtime.
pub type SharedStore = Arc<dyn ReservationStore>;

/// A manager plus the handles the caller may want to keep.
pub struct BuiltManager<E, U> {
    /// Configured manager.
    pub manager: ReservationManager<E, U, SharedStore>,
    /// In-memory audit buffer when `audit_capacity > 0`.
    pub audit: Option<Arc<Mutex<InMemoryAuditSink>>>,
}

/// Open the store backend named by the configuration.
pub fn build_store(cfg: &AdmissionConfig) -> AppResult<SharedStore> {
    cfg.validate().map_err(anyhow::Error::msg)?;
    let store: SharedStore = match &cfg.store {
        StoreBackendConfig::InMemory => Arc::new(InMemoryReservationStore::new()),
        StoreBackendConfig::Journal { path, stream } => {
            Arc::new(JournalReservationStore::open(path, stream.clone())?)
        }
    };
    Ok(store)
}

/// Build a reservation manager around the given registries.
///
/// With `audit_capacity > 0` decisions go to a bounded in-memory buffer
/// returned to the caller; otherwise they are emitted through `tracing`.
pub fn build_manager<E, U>(cfg: &AdmissionConfig, events: E, users: U) -> AppResult<BuiltManager<E, U>>
where
    E: EventRegistry,
    U: UserRegistry,
{
    let store = build_store(cfg)?;
    let controller =
        AdmissionController::new(events, users, store).with_lookup_timeout(cfg.lookup_timeout());

    let (controller, audit) = if cfg.audit_capacity > 0 {
        let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(cfg.audit_capacity)));
        (controller.with_audit(Box::new(Arc::clone(&sink))), Some(sink))
    } else {
        (controller.with_audit(Box::new(TracingAuditSink)), None)
    };

    tracing::info!("reservation manager ready ({:?} store)", cfg.store);
    Ok(BuiltManager {
        manager: ReservationManager::new(controller),
        audit,
    })
}
