//! Linguo - translation task requester client
//!
//! Linguo tracks the translation tasks an account has requested. A fetch is
//! broadcast on an in-process event bus, served by a task provider worker and
//! reconciled back into a per-account slot by correlation key.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): event bus, requester reconciliation, task worker
//! - **Adapters** (`adapters`): in-memory and file-backed task providers
//! - **Application Layer** (`application`): the wired client
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use linguo::{adapters::InMemoryTaskProvider, AccountKey, Config, LinguoClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = LinguoClient::start(&Config::default(), Arc::new(InMemoryTaskProvider::default()));
//!     let outcome = client.fetch_and_wait(AccountKey::from("0xabc"), Duration::from_secs(5)).await?;
//!     println!("{:?}", outcome.loading_state);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{LinguoClient, Navigation, RequesterOutcome};
pub use domain::errors::{DomainError, FetchError};
pub use domain::models::{
    AccountKey, Config, CorrelationKey, FetchSlot, LoadingState, RequesterState, Task, TaskId,
    TaskParty, TaskStatus,
};
pub use domain::ports::{TaskDataProvider, TaskLookup};
pub use services::{EventBus, RequesterService, TasksWorker};
