use async_trait::async_trait;

use crate::domain::errors::FetchError;
use crate::domain::models::{AccountKey, Task, TaskParty};

/// Port for the external source of task data (the marketplace contract
/// behind a wallet-backed client).
#[async_trait]
pub trait TaskDataProvider: Send + Sync {
    /// Fetch every task in which `account` plays `party`, in provider order.
    async fn fetch_by_party(
        &self,
        account: &AccountKey,
        party: TaskParty,
    ) -> Result<Vec<Task>, FetchError>;
}
