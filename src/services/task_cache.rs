//! Task-by-id cache filled from provider responses.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::models::{Task, TaskId};
use crate::domain::ports::TaskLookup;

/// Latest known copy of every task a fetch has returned.
#[derive(Debug, Default)]
pub struct TaskCache {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `tasks`.
    pub async fn upsert_many(&self, tasks: &[Task]) {
        let mut cache = self.tasks.write().await;
        for task in tasks {
            cache.insert(task.id, task.clone());
        }
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskLookup for TaskCache {
    async fn get(&self, id: TaskId) -> Option<Task> {
        self.tasks.read().await.get(&id).cloned()
    }
}
