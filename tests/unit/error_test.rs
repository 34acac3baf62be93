//! Tests for error types

use prometheus_reservations::core::{ErrorKind, ReservationError, StoreError};

#[test]
fn test_store_error_display() {
    assert_eq!(format!("{}", StoreError::DuplicateKey), "duplicate key");
    assert_eq!(
        format!("{}", StoreError::CapacityExceeded { count: 3, max: 3 }),
        "capacity exceeded: 3/3"
    );
    assert_eq!(
        format!("{}", StoreError::Unavailable("disk full".into())),
        "storage unavailable: disk full"
    );
}

#[test]
fn test_reservation_error_kinds_are_distinct() {
    assert_eq!(ReservationError::EventNotFound(1).kind(), ErrorKind::Reference);
    assert_eq!(ReservationError::UserNotFound(1).kind(), ErrorKind::Reference);
    assert_eq!(ReservationError::CapacityExceeded(1).kind(), ErrorKind::Capacity);
    assert_eq!(ReservationError::AlreadyReserved(1, 2).kind(), ErrorKind::Conflict);
    assert_eq!(ReservationError::Storage("io".into()).kind(), ErrorKind::Storage);
}

#[test]
fn test_only_storage_errors_retry() {
    assert!(ReservationError::Storage("timeout".into()).is_retryable());
    assert!(!ReservationError::CapacityExceeded(1).is_retryable());
    assert!(!ReservationError::AlreadyReserved(1, 2).is_retryable());
    assert!(!ReservationError::EventNotFound(1).is_retryable());
}

#[test]
fn test_store_error_conversion() {
    assert_eq!(
        ReservationError::from(StoreError::NotFound(9)),
        ReservationError::ReservationNotFound(9)
    );
    assert_eq!(
        ReservationError::from(StoreError::Unavailable("x".into())),
        ReservationError::Storage("storage unavailable: x".into())
    );
}
