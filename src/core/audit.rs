//! Audit sink implementations.
//!
//! Every admission decision and delete can be recorded for later inspection.

use std::collections::VecDeque;

use crate::core::model::{EventId, ReservationId, UserId};
use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Audit record identifier.
    pub audit_id: String,
    /// Reservation touched by the action, when one exists.
    pub reservation_id: Option<ReservationId>,
    /// Event the request targeted.
    pub event_id: EventId,
    /// User the request targeted.
    pub user_id: UserId,
    /// Action taken (admit, reject_capacity, reject_duplicate, reject_event, reject_user, delete).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards audit events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "reservation_audit",
            audit_id = %event.audit_id,
            reservation_id = ?event.reservation_id,
            event_id = event.event_id,
            user_id = event.user_id,
            action = %event.action,
            "audit"
        );
    }
}

/// Helper to build an audit event with a fresh id and the current time.
pub fn build_audit_event(
    reservation_id: Option<ReservationId>,
    event_id: EventId,
    user_id: UserId,
    action: impl Into<String>,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        audit_id: uuid::Uuid::new_v4().to_string(),
        reservation_id,
        event_id,
        user_id,
        action: action.into(),
        created_at_ms: now_ms(),
        payload,
    }
}

/// Shared sinks let the caller keep a handle for reading back records.
impl<A: AuditSink> AuditSink for std::sync::Arc<parking_lot::Mutex<A>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}
