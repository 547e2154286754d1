//! Centralized event construction helpers.
//!
//! All event construction should go through these helpers so the
//! envelope defaults (id, timestamp, unassigned sequence) stay in one place.

use chrono::Utc;

use crate::domain::models::CorrelationKey;

use super::event_bus::{
    EventCategory, EventId, EventPayload, EventSeverity, SequenceNumber, UnifiedEvent,
};

/// Build a `UnifiedEvent` with standard defaults.
///
/// Sequence is set to 0 (assigned by EventBus on publish).
pub fn make_event(
    severity: EventSeverity,
    category: EventCategory,
    correlation_key: Option<CorrelationKey>,
    payload: EventPayload,
) -> UnifiedEvent {
    UnifiedEvent {
        id: EventId::new(),
        sequence: SequenceNumber::zero(),
        timestamp: Utc::now(),
        severity,
        category,
        correlation_key,
        payload,
    }
}

/// Build a requester-category event.
pub fn requester_event(
    severity: EventSeverity,
    correlation_key: Option<CorrelationKey>,
    payload: EventPayload,
) -> UnifiedEvent {
    make_event(severity, EventCategory::Requester, correlation_key, payload)
}

/// Build a tasks-category event.
pub fn tasks_event(
    severity: EventSeverity,
    correlation_key: Option<CorrelationKey>,
    payload: EventPayload,
) -> UnifiedEvent {
    make_event(severity, EventCategory::Tasks, correlation_key, payload)
}

/// Build a navigation event caused by the fetch keyed by `key`.
pub fn navigation_event(key: CorrelationKey, route: &str, message: &str) -> UnifiedEvent {
    make_event(
        EventSeverity::Info,
        EventCategory::Navigation,
        Some(key),
        EventPayload::NavigationRequested {
            route: route.to_string(),
            message: message.to_string(),
        },
    )
}
