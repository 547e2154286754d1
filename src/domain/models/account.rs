//! Account identity used to key requester state.

use serde::{Deserialize, Serialize};

/// Identifier of the account whose tasks are fetched.
///
/// `None` stands for the not-yet-connected wallet and is a valid key on its
/// own: fetches issued before a wallet connects land in that slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKey(Option<String>);

impl AccountKey {
    pub fn new(account: Option<String>) -> Self {
        Self(account)
    }

    /// The "no account" sentinel.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl From<&str> for AccountKey {
    fn from(account: &str) -> Self {
        Self(Some(account.to_string()))
    }
}

impl From<String> for AccountKey {
    fn from(account: String) -> Self {
        Self(Some(account))
    }
}

impl From<Option<String>> for AccountKey {
    fn from(account: Option<String>) -> Self {
        Self(account)
    }
}

impl std::fmt::Display for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(account) => write!(f, "{account}"),
            None => write!(f, "<none>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_some_are_distinct_keys() {
        assert_ne!(AccountKey::none(), AccountKey::from("0xabc"));
        assert_eq!(AccountKey::default(), AccountKey::none());
        assert_eq!(AccountKey::none().to_string(), "<none>");
    }

    #[test]
    fn test_serializes_as_nullable_string() {
        assert_eq!(serde_json::to_string(&AccountKey::none()).unwrap(), "null");
        assert_eq!(serde_json::to_string(&AccountKey::from("0xabc")).unwrap(), "\"0xabc\"");
    }
}
