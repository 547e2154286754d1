//! Requester task-list service.
//!
//! Owns the per-account fetch slots and is their only writer. A
//! user-initiated fetch mints a correlation key, marks the slot loading and
//! emits a `FetchByParty` request; a reconciler spawned for that call then
//! waits on its own bus subscription for the completion carrying the same
//! key. A second, long-lived listener settles fetches that other parts of the
//! system trigger with the reserved internal key.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};
use tokio::task::{AbortHandle, JoinHandle};

use crate::domain::errors::FetchError;
use crate::domain::models::{
    AccountKey, CorrelationKey, FetchSlot, LoadingState, ReconcilerConfig, RequesterState, Task,
    TaskId, TaskParty,
};
use crate::domain::ports::TaskLookup;

use super::event_bus::{EventBus, EventPayload, EventSeverity, UnifiedEvent};
use super::event_factory::{navigation_event, requester_event, tasks_event};

/// Route of the "create new translation request" view.
pub const TRANSLATION_REQUEST_ROUTE: &str = "/translation/request";

/// Message shown when a requester has no tasks yet.
pub const NO_REQUESTS_MESSAGE: &str =
    "You have no translation requests yet! You can create one here.";

/// Outcome of a provider fetch as seen by a reconciler.
pub type FetchOutcome = Result<Vec<Task>, FetchError>;

/// Settings for the requester service.
#[derive(Debug, Clone, Default)]
pub struct RequesterConfig {
    /// Upper bound on how long a user-initiated fetch waits for its completion.
    pub fetch_timeout: Option<Duration>,
}

impl From<&ReconcilerConfig> for RequesterConfig {
    fn from(config: &ReconcilerConfig) -> Self {
        Self {
            fetch_timeout: config.fetch_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// The user-initiated fetch currently honored for an account.
struct InFlight {
    key: CorrelationKey,
    abort: Option<AbortHandle>,
}

#[derive(Default)]
struct Inner {
    state: RequesterState,
    in_flight: HashMap<AccountKey, InFlight>,
}

/// Extract the outcome from `event` if it completes the fetch keyed by `key`.
pub fn completion_for(event: &UnifiedEvent, key: &CorrelationKey) -> Option<FetchOutcome> {
    if !event.has_key(key) {
        return None;
    }
    match &event.payload {
        EventPayload::FetchByPartyFulfilled { data } => Some(Ok(data.clone())),
        EventPayload::FetchByPartyRejected { error } => Some(Err(error.clone())),
        _ => None,
    }
}

/// Wait for the first completion carrying `key`, ignoring everything else.
///
/// Returns `None` once the bus is closed.
async fn next_completion(
    receiver: &mut broadcast::Receiver<UnifiedEvent>,
    key: &CorrelationKey,
) -> Option<FetchOutcome> {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                if let Some(outcome) = completion_for(&event, key) {
                    return Some(outcome);
                }
            }
            Err(RecvError::Lagged(n)) => {
                tracing::warn!(key = %key, missed = n, "reconciler lagged behind the event bus");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Requester task-list service.
/// Owner of the requester slots.
///
/// Cloning shares the slots. Reconcilers spawned by the service only hold
/// the bus weakly: once every owner is dropped the bus closes and they stop.
#[derive(Clone)]
pub struct RequesterService {
    inner: Arc<RwLock<Inner>>,
    event_bus: Arc<EventBus>,
    config: RequesterConfig,
}

impl RequesterService {
    pub fn new(event_bus: Arc<EventBus>, config: RequesterConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            event_bus,
            config,
        }
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler {
            inner: self.inner.clone(),
            event_bus: Arc::downgrade(&self.event_bus),
            fetch_timeout: self.config.fetch_timeout,
        }
    }

    /// Fetch the tasks `account` requested.
    ///
    /// Uses `key` when given, otherwise mints a fresh one. When this returns
    /// the slot is already `Loading` and the request has been emitted. A
    /// fetch still in flight for the same account is superseded: its
    /// completion, should it arrive later, is ignored.
    pub async fn fetch_tasks(
        &self,
        account: AccountKey,
        key: Option<CorrelationKey>,
    ) -> CorrelationKey {
        let key = key.unwrap_or_else(CorrelationKey::generate);

        // Subscribe before the request goes out so the completion cannot be missed.
        let receiver = self.event_bus.subscribe();

        {
            let mut inner = self.inner.write().await;
            let previous = inner
                .in_flight
                .insert(account.clone(), InFlight { key, abort: None });
            if let Some(previous) = previous {
                if let Some(abort) = previous.abort {
                    abort.abort();
                }
                tracing::debug!(
                    account = %account,
                    superseded = %previous.key,
                    key = %key,
                    "superseding in-flight fetch"
                );
            }
            inner.state.mark_loading(&account);
        }

        self.event_bus.publish(requester_event(
            EventSeverity::Info,
            Some(key),
            EventPayload::FetchTasks {
                account: account.clone(),
            },
        ));

        let handle = tokio::spawn(self.reconciler().reconcile_call(receiver, account.clone(), key));
        {
            let mut inner = self.inner.write().await;
            // Absent when already settled or superseded by a concurrent call
            if let Some(in_flight) = inner
                .in_flight
                .get_mut(&account)
                .filter(|in_flight| in_flight.key == key)
            {
                in_flight.abort = Some(handle.abort_handle());
            }
        }

        tracing::info!(account = %account, key = %key, "fetching requester tasks");
        self.event_bus.publish(tasks_event(
            EventSeverity::Info,
            Some(key),
            EventPayload::FetchByParty {
                account,
                party: TaskParty::Requester,
            },
        ));

        key
    }

    /// Start the listener that settles internally triggered requester fetches.
    ///
    /// Every `FetchByParty` request carrying the internal key and the
    /// requester party arms a waiter for its account; the next completion
    /// carrying the internal key settles all armed waiters. Other requests
    /// are ignored. Runs until the bus closes or the handle is aborted.
    pub fn spawn_internal_listener(&self) -> JoinHandle<()> {
        let mut receiver = self.event_bus.subscribe();
        let reconciler = self.reconciler();

        tokio::spawn(async move {
            let mut armed: Vec<AccountKey> = Vec::new();

            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(missed = n, "internal fetch listener lagged behind the event bus");
                        continue;
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event bus closed, stopping internal fetch listener");
                        break;
                    }
                };

                if let EventPayload::FetchByParty { account, party } = &event.payload {
                    if event.has_key(&CorrelationKey::Internal) && *party == TaskParty::Requester {
                        tracing::debug!(account = %account, "armed internal requester fetch");
                        armed.push(account.clone());
                    }
                    continue;
                }

                if armed.is_empty() || !event.payload.is_fetch_completion() {
                    continue;
                }

                if let Some(outcome) = completion_for(&event, &CorrelationKey::Internal) {
                    for account in armed.drain(..) {
                        reconciler.settle_internal(account, outcome.clone()).await;
                    }
                }
            }
        })
    }

    // -----------------------------------------------------------------------
    // Selectors
    // -----------------------------------------------------------------------

    pub async fn loading_state(&self, account: &AccountKey) -> LoadingState {
        self.inner.read().await.state.loading_state(account)
    }

    pub async fn is_idle(&self, account: &AccountKey) -> bool {
        self.loading_state(account).await == LoadingState::Idle
    }

    pub async fn is_loading(&self, account: &AccountKey) -> bool {
        self.loading_state(account).await == LoadingState::Loading
    }

    pub async fn has_fetched(&self, account: &AccountKey) -> bool {
        self.loading_state(account).await == LoadingState::Fetched
    }

    pub async fn has_failed(&self, account: &AccountKey) -> bool {
        self.loading_state(account).await == LoadingState::Failed
    }

    /// Cached task ids for `account`, in provider order.
    pub async fn task_ids(&self, account: &AccountKey) -> Vec<TaskId> {
        self.inner.read().await.state.task_ids(account)
    }

    /// Cached tasks for `account`, resolved through `lookup`.
    pub async fn tasks(&self, account: &AccountKey, lookup: &dyn TaskLookup) -> Vec<Task> {
        let ids = self.task_ids(account).await;
        lookup.get_many(&ids).await
    }

    /// Copy of the slot for `account`; idle and empty if never fetched.
    pub async fn slot(&self, account: &AccountKey) -> FetchSlot {
        self.inner
            .read()
            .await
            .state
            .slot(account)
            .cloned()
            .unwrap_or_default()
    }

    /// Key of the user-initiated fetch currently honored for `account`.
    pub async fn in_flight_key(&self, account: &AccountKey) -> Option<CorrelationKey> {
        self.inner
            .read()
            .await
            .in_flight
            .get(account)
            .map(|in_flight| in_flight.key)
    }
}

fn ids_of(tasks: &[Task]) -> Vec<TaskId> {
    tasks.iter().map(|task| task.id).collect()
}

/// State handle carried by spawned reconcilers.
struct Reconciler {
    inner: Arc<RwLock<Inner>>,
    event_bus: Weak<EventBus>,
    fetch_timeout: Option<Duration>,
}

impl Reconciler {
    fn publish(&self, event: UnifiedEvent) {
        match self.event_bus.upgrade() {
            Some(bus) => {
                bus.publish(event);
            }
            None => tracing::debug!(
                event = event.payload.variant_name(),
                "event bus dropped, discarding event"
            ),
        }
    }

    /// Per-call reconciler: settle the fetch keyed by `key` exactly once.
    async fn reconcile_call(
        self,
        mut receiver: broadcast::Receiver<UnifiedEvent>,
        account: AccountKey,
        key: CorrelationKey,
    ) {
        let outcome = match self.fetch_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, next_completion(&mut receiver, &key)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Some(Err(FetchError::TimedOut {
                        after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })),
                }
            }
            None => next_completion(&mut receiver, &key).await,
        };

        let Some(outcome) = outcome else {
            tracing::debug!(account = %account, key = %key, "event bus closed before completion");
            self.release(&account, &key).await;
            return;
        };

        let ids = match &outcome {
            Ok(tasks) => ids_of(tasks),
            Err(_) => Vec::new(),
        };
        {
            let mut inner = self.inner.write().await;
            let is_current = inner
                .in_flight
                .get(&account)
                .is_some_and(|in_flight| in_flight.key == key);
            if !is_current {
                tracing::debug!(account = %account, key = %key, "dropping superseded completion");
                return;
            }
            inner.in_flight.remove(&account);
            match &outcome {
                Ok(_) => inner.state.mark_fetched(&account, ids.clone()),
                Err(_) => inner.state.mark_failed(&account),
            }
        }

        match outcome {
            Ok(_) => {
                tracing::info!(account = %account, key = %key, count = ids.len(), "requester tasks fetched");
                let empty = ids.is_empty();
                self.publish(requester_event(
                    EventSeverity::Info,
                    Some(key),
                    EventPayload::FetchTasksFulfilled {
                        account,
                        data: ids,
                    },
                ));
                if empty {
                    self.publish(navigation_event(
                        key,
                        TRANSLATION_REQUEST_ROUTE,
                        NO_REQUESTS_MESSAGE,
                    ));
                }
            }
            Err(error) => {
                tracing::warn!(account = %account, key = %key, error = %error, "requester task fetch failed");
                self.publish(requester_event(
                    EventSeverity::Error,
                    Some(key),
                    EventPayload::FetchTasksRejected { account, error },
                ));
            }
        }
    }

    async fn release(&self, account: &AccountKey, key: &CorrelationKey) {
        let mut inner = self.inner.write().await;
        if inner
            .in_flight
            .get(account)
            .is_some_and(|in_flight| in_flight.key == *key)
        {
            inner.in_flight.remove(account);
        }
    }

    /// Apply an internally triggered outcome. Never navigates.
    async fn settle_internal(&self, account: AccountKey, outcome: FetchOutcome) {
        match outcome {
            Ok(tasks) => {
                let ids = ids_of(&tasks);
                self.inner
                    .write()
                    .await
                    .state
                    .mark_fetched(&account, ids.clone());
                tracing::debug!(account = %account, count = ids.len(), "internal requester fetch settled");
                self.publish(requester_event(
                    EventSeverity::Info,
                    Some(CorrelationKey::Internal),
                    EventPayload::FetchTasksFulfilled { account, data: ids },
                ));
            }
            Err(error) => {
                self.inner.write().await.state.mark_failed(&account);
                tracing::warn!(account = %account, error = %error, "internal requester fetch failed");
                self.publish(requester_event(
                    EventSeverity::Error,
                    Some(CorrelationKey::Internal),
                    EventPayload::FetchTasksRejected { account, error },
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service() -> (RequesterService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        (RequesterService::new(bus.clone(), RequesterConfig::default()), bus)
    }

    fn task(id: u64) -> Task {
        Task::new(id, format!("task {id}"), "0xabc", "en", "es", Utc::now())
    }

    fn fulfilled(key: CorrelationKey, data: Vec<Task>) -> UnifiedEvent {
        tasks_event(
            EventSeverity::Info,
            Some(key),
            EventPayload::FetchByPartyFulfilled { data },
        )
    }

    async fn wait_for_state(service: &RequesterService, account: &AccountKey, state: LoadingState) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while service.loading_state(account).await != state {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("slot never reached expected state");
    }

    #[test]
    fn test_completion_for_matches_key_and_shape() {
        let key = CorrelationKey::generate();
        let other = CorrelationKey::generate();

        assert!(completion_for(&fulfilled(key, vec![]), &key).is_some());
        assert!(completion_for(&fulfilled(other, vec![]), &key).is_none());

        let request = tasks_event(
            EventSeverity::Info,
            Some(key),
            EventPayload::FetchByParty {
                account: AccountKey::none(),
                party: TaskParty::Requester,
            },
        );
        assert!(completion_for(&request, &key).is_none());
    }

    #[tokio::test]
    async fn test_fetch_marks_loading_and_emits_request() {
        let (service, bus) = service();
        let mut rx = bus.subscribe();
        let account = AccountKey::from("0xabc");

        let key = service.fetch_tasks(account.clone(), None).await;

        assert!(service.is_loading(&account).await);
        assert_eq!(service.in_flight_key(&account).await, Some(key));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first.payload, EventPayload::FetchTasks { .. }));
        let request = rx.recv().await.unwrap();
        assert!(request.has_key(&key));
        assert!(matches!(
            request.payload,
            EventPayload::FetchByParty { party: TaskParty::Requester, .. }
        ));
    }

    #[tokio::test]
    async fn test_supplied_key_is_used() {
        let (service, _bus) = service();
        let key = CorrelationKey::generate();

        let used = service.fetch_tasks(AccountKey::none(), Some(key)).await;
        assert_eq!(used, key);
    }

    #[tokio::test]
    async fn test_fulfilled_completion_settles_slot() {
        let (service, bus) = service();
        let account = AccountKey::from("0xabc");

        let key = service.fetch_tasks(account.clone(), None).await;
        bus.publish(fulfilled(key, vec![task(1), task(2)]));

        wait_for_state(&service, &account, LoadingState::Fetched).await;
        assert_eq!(service.task_ids(&account).await, vec![TaskId(1), TaskId(2)]);
        assert!(service.in_flight_key(&account).await.is_none());
    }

    #[tokio::test]
    async fn test_timeout_fails_the_slot() {
        let bus = Arc::new(EventBus::default());
        let service = RequesterService::new(
            bus.clone(),
            RequesterConfig {
                fetch_timeout: Some(Duration::from_millis(20)),
            },
        );
        let account = AccountKey::from("0xabc");
        let mut rx = bus.subscribe();

        service.fetch_tasks(account.clone(), None).await;
        wait_for_state(&service, &account, LoadingState::Failed).await;

        loop {
            let event = rx.recv().await.unwrap();
            if let EventPayload::FetchTasksRejected { error, .. } = event.payload {
                assert_eq!(error, FetchError::TimedOut { after_ms: 20 });
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_closed_bus_releases_pending_fetch() {
        let (service, bus) = service();
        let account = AccountKey::from("0xabc");
        service.fetch_tasks(account.clone(), None).await;
        let inner = service.inner.clone();
        let weak = Arc::downgrade(&bus);

        drop(service);
        drop(bus);

        tokio::time::timeout(Duration::from_secs(1), async {
            while !inner.read().await.in_flight.is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("pending fetch should be released once the bus closes");

        assert!(weak.upgrade().is_none());
        let inner = inner.read().await;
        assert_eq!(inner.state.loading_state(&account), LoadingState::Loading);
    }

    #[tokio::test]
    async fn test_internal_listener_stops_when_owners_are_dropped() {
        let (service, bus) = service();
        let listener = service.spawn_internal_listener();
        let weak = Arc::downgrade(&bus);

        drop(service);
        drop(bus);

        tokio::time::timeout(Duration::from_secs(1), listener)
            .await
            .expect("internal listener should stop once the bus closes")
            .unwrap();
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_navigation_carries_fetch_key() {
        let (service, bus) = service();
        let mut rx = bus.subscribe();
        let key = service.fetch_tasks(AccountKey::none(), None).await;

        bus.publish(fulfilled(key, vec![]));

        loop {
            let event = rx.recv().await.unwrap();
            if let EventPayload::NavigationRequested { route, .. } = &event.payload {
                assert_eq!(route, TRANSLATION_REQUEST_ROUTE);
                assert!(event.has_key(&key));
                break;
            }
        }
    }
}
