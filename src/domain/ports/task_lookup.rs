use async_trait::async_trait;

use crate::domain::models::{Task, TaskId};

/// Port for resolving cached task ids to tasks.
#[async_trait]
pub trait TaskLookup: Send + Sync {
    /// Get a task by ID
    async fn get(&self, id: TaskId) -> Option<Task>;

    /// Resolve `ids` in order, skipping ids that are not known.
    async fn get_many(&self, ids: &[TaskId]) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(task) = self.get(*id).await {
                tasks.push(task);
            }
        }
        tasks
    }
}
