//! Correlation keys pairing a fetch request with its completion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Textual form of the reserved key used by background refreshes.
pub const INTERNAL_FETCH_KEY: &str = "@@internal";

/// Opaque token carried by a fetch request and echoed by its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationKey {
    /// Fresh key minted for one user-initiated fetch.
    Generated(Uuid),
    /// Reserved well-known key shared by every internally triggered fetch.
    Internal,
}

impl CorrelationKey {
    /// Mint a fresh key.
    pub fn generate() -> Self {
        Self::Generated(Uuid::new_v4())
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Parse the textual form produced by `Display`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s == INTERNAL_FETCH_KEY {
            return Ok(Self::Internal);
        }
        Uuid::parse_str(s)
            .map(Self::Generated)
            .map_err(|_| DomainError::InvalidCorrelationKey(s.to_string()))
    }
}

impl std::fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated(id) => write!(f, "{id}"),
            Self::Internal => write!(f, "{INTERNAL_FETCH_KEY}"),
        }
    }
}
