//! EventBus service for in-process event broadcasting.
//!
//! Every listener holds its own receiver, so no event is consumed on behalf
//! of another listener. Events carry a monotonically increasing sequence
//! number and, for fetch traffic, the correlation key that pairs a request
//! with its completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::errors::FetchError;
use crate::domain::models::{AccountKey, CorrelationKey, Task, TaskId, TaskParty};

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing sequence number assigned by EventBus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    pub fn zero() -> Self {
        Self(0)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Event category for filtering and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Requester task-list lifecycle
    Requester,
    /// Traffic to and from the task-data provider
    Tasks,
    /// Navigation side effects for the presentation layer
    Navigation,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requester => write!(f, "requester"),
            Self::Tasks => write!(f, "tasks"),
            Self::Navigation => write!(f, "navigation"),
        }
    }
}

/// Event envelope containing all event metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedEvent {
    pub id: EventId,
    pub sequence: SequenceNumber,
    pub timestamp: DateTime<Utc>,
    pub severity: EventSeverity,
    pub category: EventCategory,
    pub correlation_key: Option<CorrelationKey>,
    pub payload: EventPayload,
}

impl UnifiedEvent {
    /// Whether this event carries `key`.
    pub fn has_key(&self, key: &CorrelationKey) -> bool {
        self.correlation_key.as_ref() == Some(key)
    }
}

/// Event payloads exchanged over the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    // Requester task list
    FetchTasks {
        account: AccountKey,
    },
    FetchTasksFulfilled {
        account: AccountKey,
        data: Vec<TaskId>,
    },
    FetchTasksRejected {
        account: AccountKey,
        error: FetchError,
    },

    // Task-data provider
    FetchByParty {
        account: AccountKey,
        party: TaskParty,
    },
    FetchByPartyFulfilled {
        data: Vec<Task>,
    },
    FetchByPartyRejected {
        error: FetchError,
    },

    // Presentation side effects
    NavigationRequested {
        route: String,
        message: String,
    },
}

impl EventPayload {
    /// Name of the payload variant, used in logs and filters.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::FetchTasks { .. } => "FetchTasks",
            Self::FetchTasksFulfilled { .. } => "FetchTasksFulfilled",
            Self::FetchTasksRejected { .. } => "FetchTasksRejected",
            Self::FetchByParty { .. } => "FetchByParty",
            Self::FetchByPartyFulfilled { .. } => "FetchByPartyFulfilled",
            Self::FetchByPartyRejected { .. } => "FetchByPartyRejected",
            Self::NavigationRequested { .. } => "NavigationRequested",
        }
    }

    /// Whether this payload completes a provider fetch.
    pub fn is_fetch_completion(&self) -> bool {
        matches!(
            self,
            Self::FetchByPartyFulfilled { .. } | Self::FetchByPartyRejected { .. }
        )
    }
}

/// Configuration for the EventBus.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for the broadcast channel.
    pub channel_capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

impl From<&crate::domain::models::EventBusSettings> for EventBusConfig {
    fn from(settings: &crate::domain::models::EventBusSettings) -> Self {
        Self {
            channel_capacity: settings.channel_capacity,
        }
    }
}

/// Central event bus for broadcasting events to multiple consumers.
pub struct EventBus {
    sender: broadcast::Sender<UnifiedEvent>,
    sequence: AtomicU64,
}

impl EventBus {
    /// Create a new EventBus with the given configuration.
    pub fn new(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            sequence: AtomicU64::new(0),
        }
    }

    /// Publish an event, returning the sequence number it was assigned.
    pub fn publish(&self, mut event: UnifiedEvent) -> SequenceNumber {
        let seq = SequenceNumber(self.sequence.fetch_add(1, Ordering::SeqCst));
        event.sequence = seq;

        match event.severity {
            EventSeverity::Error | EventSeverity::Warning => tracing::warn!(
                sequence = %seq,
                event = event.payload.variant_name(),
                key = ?event.correlation_key,
                "publishing event"
            ),
            _ => tracing::debug!(
                sequence = %seq,
                event = event.payload.variant_name(),
                key = ?event.correlation_key,
                "publishing event"
            ),
        }

        // No subscribers is not an error
        let _ = self.sender.send(event);
        seq
    }

    /// Subscribe to the event stream.
    ///
    /// The receiver observes every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<UnifiedEvent> {
        self.sender.subscribe()
    }

    /// Get the current sequence number.
    pub fn current_sequence(&self) -> SequenceNumber {
        SequenceNumber(self.sequence.load(Ordering::SeqCst))
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EventBusConfig::default())
    }
}
