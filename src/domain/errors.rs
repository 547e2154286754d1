//! Domain errors for the Linguo requester client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a task fetch did not produce data.
///
/// Provider errors are opaque: whatever the provider reported is carried
/// through to the slot unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("{0}")]
    Provider(String),

    #[error("No completion received within {after_ms}ms")]
    TimedOut { after_ms: u64 },
}

impl FetchError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}

/// Domain-level errors that can occur outside the fetch path.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid correlation key: {0}")]
    InvalidCorrelationKey(String),

    #[error("Invalid task status: {0}")]
    InvalidTaskStatus(String),

    #[error("Task not found: {0}")]
    TaskNotFound(u64),

    #[error("Invalid task fixture {path}: {reason}")]
    InvalidFixture { path: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(err: serde_yaml::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
