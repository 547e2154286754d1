use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::errors::FetchError;
use crate::domain::models::{AccountKey, Config, CorrelationKey, LoadingState, Task, TaskParty};
use crate::domain::ports::TaskDataProvider;
use crate::services::event_bus::{EventBus, EventBusConfig, EventPayload, UnifiedEvent};
use crate::services::requester_service::{RequesterConfig, RequesterService};
use crate::services::task_cache::TaskCache;
use crate::services::tasks_worker::TasksWorker;

/// Navigation requested by the requester flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub route: String,
    pub message: String,
}

/// Settled view of one account's requester task list.
#[derive(Debug, Clone, Serialize)]
pub struct RequesterOutcome {
    pub account: AccountKey,
    pub key: CorrelationKey,
    pub loading_state: LoadingState,
    pub tasks: Vec<Task>,
    pub error: Option<FetchError>,
    pub navigation: Option<Navigation>,
}

/// Fully wired requester client: event bus, task provider worker,
/// requester service and its internal-fetch listener.
///
/// Background tasks are aborted when the client is dropped.
pub struct LinguoClient {
    event_bus: Arc<EventBus>,
    requester: RequesterService,
    worker: TasksWorker,
    handles: Vec<JoinHandle<()>>,
}

impl LinguoClient {
    /// Wire and start every background listener. Must run inside a tokio runtime.
    pub fn start(config: &Config, provider: Arc<dyn TaskDataProvider>) -> Self {
        let event_bus = Arc::new(EventBus::new(EventBusConfig::from(&config.event_bus)));
        let requester =
            RequesterService::new(event_bus.clone(), RequesterConfig::from(&config.reconciler));
        let worker = TasksWorker::new(provider, Arc::new(TaskCache::new()), event_bus.clone());

        let mut handles = vec![worker.start(), requester.spawn_internal_listener()];

        if let Some(secs) = config.reconciler.background_refresh_secs {
            let accounts = config
                .reconciler
                .background_accounts
                .iter()
                .map(|account| AccountKey::from(account.as_str()))
                .collect();
            handles.push(worker.start_background_refresh(accounts, Duration::from_secs(secs)));
            info!(every_secs = secs, "background refresh enabled");
        }

        Self {
            event_bus,
            requester,
            worker,
            handles,
        }
    }

    pub fn requester(&self) -> &RequesterService {
        &self.requester
    }

    pub fn worker(&self) -> &TasksWorker {
        &self.worker
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn cache(&self) -> Arc<TaskCache> {
        self.worker.cache()
    }

    /// Run a user-initiated fetch and wait for it to settle.
    pub async fn fetch_and_wait(&self, account: AccountKey, wait: Duration) -> Result<RequesterOutcome> {
        let mut receiver = self.event_bus.subscribe();
        let key = self.requester.fetch_tasks(account.clone(), None).await;

        tokio::time::timeout(wait, self.settled(&mut receiver, account, key, true))
            .await
            .context(format!("Fetch did not settle within {}s", wait.as_secs()))?
    }

    /// Trigger an internal refresh and wait for the requester slot to settle.
    pub async fn refresh_and_wait(&self, account: AccountKey, wait: Duration) -> Result<RequesterOutcome> {
        let mut receiver = self.event_bus.subscribe();
        self.worker
            .refresh_internally(account.clone(), TaskParty::Requester);

        tokio::time::timeout(
            wait,
            self.settled(&mut receiver, account, CorrelationKey::Internal, false),
        )
        .await
        .context(format!("Refresh did not settle within {}s", wait.as_secs()))?
    }

    async fn settled(
        &self,
        receiver: &mut Receiver<UnifiedEvent>,
        account: AccountKey,
        key: CorrelationKey,
        expect_navigation: bool,
    ) -> Result<RequesterOutcome> {
        let mut error = None;
        let mut navigation = None;
        let mut awaiting_navigation = false;

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(n)) => {
                    debug!(missed = n, "client receiver lagged");
                    continue;
                }
                Err(RecvError::Closed) => anyhow::bail!("Event bus closed before the fetch settled"),
            };

            let ours = event.has_key(&key);
            match &event.payload {
                EventPayload::FetchTasksFulfilled { account: settled, data }
                    if ours && *settled == account =>
                {
                    if expect_navigation && data.is_empty() {
                        awaiting_navigation = true;
                        continue;
                    }
                    break;
                }
                EventPayload::FetchTasksRejected { account: settled, error: e }
                    if ours && *settled == account =>
                {
                    error = Some(e.clone());
                    break;
                }
                EventPayload::NavigationRequested { route, message } if ours && awaiting_navigation => {
                    navigation = Some(Navigation {
                        route: route.clone(),
                        message: message.clone(),
                    });
                    break;
                }
                _ => {}
            }
        }

        let slot = self.requester.slot(&account).await;
        let cache = self.cache();
        let tasks = self.requester.tasks(&account, cache.as_ref()).await;

        Ok(RequesterOutcome {
            account,
            key,
            loading_state: slot.loading_state,
            tasks,
            error,
            navigation,
        })
    }
}

impl Drop for LinguoClient {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
