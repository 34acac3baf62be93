//! Tests for audit sink

use prometheus_reservations::core::{build_audit_event, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(Some(7), 1, 2, "admit", Some("ok".to_string())));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reservation_id, Some(7));
    assert_eq!(events[0].event_id, 1);
    assert_eq!(events[0].user_id, 2);
    assert_eq!(events[0].action, "admit");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(Some(1), 1, 1, "admit", None));
    sink.record(build_audit_event(None, 1, 2, "reject_capacity", None));
    sink.record(build_audit_event(None, 1, 1, "reject_duplicate", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, "reject_capacity"); // First one popped
    assert_eq!(events[1].action, "reject_duplicate");
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event(None, 3, 4, "reject_event", None);
    let b = build_audit_event(None, 3, 4, "reject_event", None);

    assert_ne!(a.audit_id, b.audit_id);
    assert_eq!(a.reservation_id, None);
    assert!(a.created_at_ms > 0);
}
