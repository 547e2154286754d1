//! Bridge between the event bus and the external task-data provider.
//!
//! The worker serves every `FetchByParty` request seen on the bus, caches the
//! returned tasks and broadcasts the completion under the request's
//! correlation key. Requests are served concurrently, so completions for
//! unrelated keys may interleave on the bus.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::domain::models::{AccountKey, CorrelationKey, TaskParty};
use crate::domain::ports::TaskDataProvider;

use super::event_bus::{EventBus, EventPayload, EventSeverity, SequenceNumber, UnifiedEvent};
use super::event_factory::tasks_event;
use super::task_cache::TaskCache;

/// Serves fetch requests against a [`TaskDataProvider`].
#[derive(Clone)]
pub struct TasksWorker {
    provider: Arc<dyn TaskDataProvider>,
    cache: Arc<TaskCache>,
    event_bus: Arc<EventBus>,
}

impl TasksWorker {
    pub fn new(
        provider: Arc<dyn TaskDataProvider>,
        cache: Arc<TaskCache>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            cache,
            event_bus,
        }
    }

    pub fn cache(&self) -> Arc<TaskCache> {
        self.cache.clone()
    }

    /// Start serving requests. Requests published after this returns are seen.
    ///
    /// Spawned tasks hold the bus weakly and stop once it closes.
    pub fn start(&self) -> JoinHandle<()> {
        let mut receiver = self.event_bus.subscribe();
        let responder = Responder {
            provider: self.provider.clone(),
            cache: self.cache.clone(),
            event_bus: Arc::downgrade(&self.event_bus),
        };

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(missed = n, "tasks worker lagged, requests were dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event bus closed, stopping tasks worker");
                        break;
                    }
                };

                let EventPayload::FetchByParty { account, party } = event.payload else {
                    continue;
                };
                let Some(key) = event.correlation_key else {
                    tracing::warn!(account = %account, "ignoring fetch request without correlation key");
                    continue;
                };

                let responder = responder.clone();
                tokio::spawn(async move { responder.serve(account, party, key).await });
            }
        })
    }

    /// Request a background refresh under the reserved internal key.
    pub fn refresh_internally(&self, account: AccountKey, party: TaskParty) -> SequenceNumber {
        tracing::debug!(account = %account, party = %party, "requesting internal refresh");
        self.event_bus.publish(internal_request(account, party))
    }

    /// Refresh the requester tasks of `accounts` every `period`, until the bus is dropped.
    pub fn start_background_refresh(
        &self,
        accounts: Vec<AccountKey>,
        period: Duration,
    ) -> JoinHandle<()> {
        let event_bus = Arc::downgrade(&self.event_bus);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let Some(bus) = event_bus.upgrade() else {
                    tracing::debug!("event bus dropped, stopping background refresh");
                    break;
                };
                for account in &accounts {
                    bus.publish(internal_request(account.clone(), TaskParty::Requester));
                }
            }
        })
    }
}

fn internal_request(account: AccountKey, party: TaskParty) -> UnifiedEvent {
    tasks_event(
        EventSeverity::Debug,
        Some(CorrelationKey::Internal),
        EventPayload::FetchByParty { account, party },
    )
}

/// Serves one request at a time on behalf of the worker loop.
#[derive(Clone)]
struct Responder {
    provider: Arc<dyn TaskDataProvider>,
    cache: Arc<TaskCache>,
    event_bus: Weak<EventBus>,
}

impl Responder {
    async fn serve(&self, account: AccountKey, party: TaskParty, key: CorrelationKey) {
        tracing::debug!(account = %account, party = %party, key = %key, "serving fetch request");

        let event = match self.provider.fetch_by_party(&account, party).await {
            Ok(tasks) => {
                self.cache.upsert_many(&tasks).await;
                tasks_event(
                    EventSeverity::Info,
                    Some(key),
                    EventPayload::FetchByPartyFulfilled { data: tasks },
                )
            }
            Err(error) => {
                tracing::warn!(account = %account, key = %key, error = %error, "provider fetch failed");
                tasks_event(
                    EventSeverity::Error,
                    Some(key),
                    EventPayload::FetchByPartyRejected { error },
                )
            }
        };

        match self.event_bus.upgrade() {
            Some(bus) => {
                bus.publish(event);
            }
            None => tracing::debug!(key = %key, "event bus dropped before the fetch completed"),
        }
    }
}
