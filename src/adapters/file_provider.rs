//! Task-data provider reading a task fixture from disk.
//!
//! The file holds a list of tasks as JSON, or YAML when the extension is
//! `.yaml`/`.yml`. It is re-read on every fetch so edits show up on the
//! next refresh.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::{DomainError, FetchError};
use crate::domain::models::{AccountKey, Task, TaskParty};
use crate::domain::ports::TaskDataProvider;

/// Provider serving tasks from a fixture file.
#[derive(Debug, Clone)]
pub struct FileTaskProvider {
    path: PathBuf,
}

impl FileTaskProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse every task in the fixture.
    pub async fn load(&self) -> Result<Vec<Task>, DomainError> {
        let invalid = |reason: String| DomainError::InvalidFixture {
            path: self.path.display().to_string(),
            reason,
        };

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| invalid(e.to_string()))?;

        let is_yaml = matches!(
            self.path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );
        let tasks = if is_yaml {
            serde_yaml::from_str(&raw).map_err(|e| invalid(e.to_string()))?
        } else {
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?
        };
        Ok(tasks)
    }
}

#[async_trait]
impl TaskDataProvider for FileTaskProvider {
    async fn fetch_by_party(
        &self,
        account: &AccountKey,
        party: TaskParty,
    ) -> Result<Vec<Task>, FetchError> {
        let tasks = self
            .load()
            .await
            .map_err(|e| FetchError::provider(e.to_string()))?;

        Ok(tasks
            .into_iter()
            .filter(|task| task.party_for(account) == party)
            .collect())
    }
}
