//! Tests for builder modules

use prometheus_reservations::builders::build_manager;
use prometheus_reservations::config::{AdmissionConfig, StoreBackendConfig};
use prometheus_reservations::infra::{InMemoryEventRegistry, InMemoryUserRegistry};

#[tokio::test]
async fn test_build_in_memory_manager_with_audit() {
    let cfg = AdmissionConfig {
        audit_capacity: 8,
        ..AdmissionConfig::default()
    };
    let events = InMemoryEventRegistry::new();
    events.register(1, 1).unwrap();

    let built = build_manager(&cfg, events, InMemoryUserRegistry::with_users([5])).unwrap();
    built.manager.create(1, 5).await.unwrap();

    let audit = built.audit.expect("audit buffer configured");
    assert_eq!(audit.lock().events().len(), 1);
}

#[tokio::test]
async fn test_build_journal_manager() {
    let dir = std::env::temp_dir().join(format!("reservations-builder-{}", uuid::Uuid::new_v4()));
    let cfg = AdmissionConfig {
        store: StoreBackendConfig::Journal {
            path: dir.clone(),
            stream: "test".into(),
        },
        ..AdmissionConfig::default()
    };
    let events = InMemoryEventRegistry::new();
    events.register(1, 2).unwrap();

    let built = build_manager(&cfg, events, InMemoryUserRegistry::with_users([5])).unwrap();
    assert!(built.audit.is_none());
    built.manager.create(1, 5).await.unwrap();
    assert!(dir.join("test").join("event-1.jsonl").exists());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_zero_audit_capacity_uses_tracing_sink() {
    let cfg = AdmissionConfig {
        audit_capacity: 0,
        ..AdmissionConfig::default()
    };
    assert!(cfg.validate().is_ok());
    let events = InMemoryEventRegistry::new();
    events.register(1, 1).unwrap();

    let built = build_manager(&cfg, events, InMemoryUserRegistry::with_users([5])).unwrap();
    assert!(built.audit.is_none());
    built.manager.create(1, 5).await.unwrap();
    assert!(built.manager.create(1, 5).await.is_err());
}

#[test]
fn test_build_rejects_invalid_config() {
    let cfg = AdmissionConfig {
        lookup_timeout_ms: 0,
        ..AdmissionConfig::default()
    };
    let result = build_manager(&cfg, InMemoryEventRegistry::new(), InMemoryUserRegistry::new());
    assert!(result.is_err());
}
