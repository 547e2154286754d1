//! Common test utilities for integration tests
//!
//! Shared fixtures and event-bus helpers used across the integration suites.

#![allow(dead_code)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::broadcast::Receiver;

use linguo::domain::models::{AccountKey, CorrelationKey, LoadingState, Task};
use linguo::services::event_bus::{EventPayload, EventSeverity, UnifiedEvent};
use linguo::services::event_factory::tasks_event;
use linguo::RequesterService;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Task `id` requested by `requester`, due at a fixed point in the future.
pub fn task(id: u64, requester: &str) -> Task {
    let deadline = Utc.with_ymd_and_hms(2099, 1, 1, 12, 0, 0).unwrap();
    Task::new(id, format!("Task {id}"), requester, "en", "fr", deadline)
}

/// Provider completion carrying `key`.
pub fn fulfilled(key: CorrelationKey, data: Vec<Task>) -> UnifiedEvent {
    tasks_event(
        EventSeverity::Info,
        Some(key),
        EventPayload::FetchByPartyFulfilled { data },
    )
}

/// Provider failure carrying `key`.
pub fn rejected(key: CorrelationKey, message: &str) -> UnifiedEvent {
    tasks_event(
        EventSeverity::Error,
        Some(key),
        EventPayload::FetchByPartyRejected {
            error: linguo::FetchError::provider(message),
        },
    )
}

/// Wait until `account` reaches `state`, failing the test after two seconds.
pub async fn wait_for_state(service: &RequesterService, account: &AccountKey, state: LoadingState) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while service.loading_state(account).await != state {
        assert!(
            tokio::time::Instant::now() < deadline,
            "{account} never reached {state}, stuck at {}",
            service.loading_state(account).await
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Collect every event received within `window`.
pub async fn drain(receiver: &mut Receiver<UnifiedEvent>, window: Duration) -> Vec<UnifiedEvent> {
    let mut events = Vec::new();
    while let Ok(Ok(event)) = tokio::time::timeout(window, receiver.recv()).await {
        events.push(event);
    }
    events
}

/// Count the navigation requests in `events`.
pub fn navigations(events: &[UnifiedEvent]) -> Vec<(String, String)> {
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::NavigationRequested { route, message } => {
                Some((route.clone(), message.clone()))
            }
            _ => None,
        })
        .collect()
}
