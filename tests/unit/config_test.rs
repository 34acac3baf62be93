//! Tests for configuration validation

use std::collections::HashMap;
use std::path::PathBuf;

use prometheus_reservations::config::{AdmissionConfig, StoreBackendConfig};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_default_config_is_valid() {
    let cfg = AdmissionConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.store, StoreBackendConfig::InMemory);
}

#[test]
fn test_zero_timeout_rejected() {
    let cfg = AdmissionConfig {
        lookup_timeout_ms: 0,
        ..AdmissionConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_empty_journal_path_rejected() {
    let cfg = AdmissionConfig {
        store: StoreBackendConfig::Journal {
            path: PathBuf::new(),
            stream: "reservations".into(),
        },
        ..AdmissionConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "store": { "kind": "journal", "path": "/var/lib/reservations" },
        "lookup_timeout_ms": 250,
        "audit_capacity": 64
    }"#;

    let cfg = AdmissionConfig::from_json_str(json).unwrap();
    assert_eq!(
        cfg.store,
        StoreBackendConfig::Journal {
            path: PathBuf::from("/var/lib/reservations"),
            stream: "reservations".into(),
        }
    );
    assert_eq!(cfg.lookup_timeout().as_millis(), 250);
    assert_eq!(cfg.audit_capacity, 64);
}

#[test]
fn test_config_from_json_invalid() {
    assert!(AdmissionConfig::from_json_str(r#"{"store":{"kind":"in_memory"},"lookup_timeout_ms":0}"#).is_err());
    assert!(AdmissionConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_from_lookup() {
    let cfg = AdmissionConfig::from_lookup(lookup(&[
        ("RESERVATION_STORE", "journal"),
        ("RESERVATION_JOURNAL_PATH", "/tmp/res"),
        ("RESERVATION_LOOKUP_TIMEOUT_MS", "100"),
    ]))
    .unwrap();
    assert!(matches!(cfg.store, StoreBackendConfig::Journal { .. }));
    assert_eq!(cfg.lookup_timeout_ms, 100);
    assert_eq!(cfg.audit_capacity, 0);
}

#[test]
fn test_config_from_lookup_errors() {
    assert!(AdmissionConfig::from_lookup(lookup(&[("RESERVATION_STORE", "redis")])).is_err());
    assert!(AdmissionConfig::from_lookup(lookup(&[("RESERVATION_STORE", "journal")])).is_err());
    assert!(AdmissionConfig::from_lookup(lookup(&[("RESERVATION_LOOKUP_TIMEOUT_MS", "soon")])).is_err());
    assert!(AdmissionConfig::from_lookup(lookup(&[])).is_ok());
}
