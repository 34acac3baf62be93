//! Tests for utility functions

use prometheus_reservations::config::AdmissionConfig;
use prometheus_reservations::util::{init_tracing, now_ms, now_ms_u64};

#[test]
fn test_now_ms_advances() {
    let a = now_ms();
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(now_ms() > a);
}

#[test]
fn test_now_ms_u64_matches_wide_clock() {
    let wide = now_ms();
    let narrow = now_ms_u64();
    assert!(u128::from(narrow) >= wide);
    assert!(u128::from(narrow) - wide < 1_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized");
}

#[test]
fn test_config_from_process_env() {
    // RESERVATION_* variables are not set in the test environment.
    let cfg = AdmissionConfig::from_env().unwrap();
    assert!(cfg.validate().is_ok());
}
