//! In-memory task-data provider.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::FetchError;
use crate::domain::models::{AccountKey, Task, TaskParty};
use crate::domain::ports::TaskDataProvider;

/// Provider backed by a task list held in memory.
///
/// Answers by filtering on the party each task assigns to the account.
/// Can be told to fail or to answer after a delay.
#[derive(Debug, Default)]
pub struct InMemoryTaskProvider {
    tasks: RwLock<Vec<Task>>,
    failure: Option<String>,
    latency: Option<Duration>,
}

impl InMemoryTaskProvider {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            failure: None,
            latency: None,
        }
    }

    /// Reject every fetch with `message`.
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn insert(&self, task: Task) {
        self.tasks.write().await.push(task);
    }
}

#[async_trait]
impl TaskDataProvider for InMemoryTaskProvider {
    async fn fetch_by_party(
        &self,
        account: &AccountKey,
        party: TaskParty,
    ) -> Result<Vec<Task>, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(ref message) = self.failure {
            return Err(FetchError::provider(message.clone()));
        }

        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|task| task.party_for(account) == party)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_filters_by_party() {
        let now = Utc::now();
        let mut translated = Task::new(2, "b", "0xother", "en", "it", now);
        translated.translator = Some("0xabc".to_string());
        let provider = InMemoryTaskProvider::new(vec![
            Task::new(1, "a", "0xabc", "en", "it", now),
            translated,
        ]);
        let account = AccountKey::from("0xabc");

        let requested = provider.fetch_by_party(&account, TaskParty::Requester).await.unwrap();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].id.0, 1);

        let translating = provider.fetch_by_party(&account, TaskParty::Translator).await.unwrap();
        assert_eq!(translating[0].id.0, 2);
    }

    #[tokio::test]
    async fn test_failure() {
        let provider = InMemoryTaskProvider::default().failing_with("boom");
        let result = provider.fetch_by_party(&AccountKey::none(), TaskParty::Requester).await;
        assert_eq!(result, Err(FetchError::provider("boom")));
    }
}
