//! Per-account fetch slots and the requester state they make up.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::account::AccountKey;
use super::task::TaskId;

/// Loading state of an account's task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Fetched,
    Failed,
}

impl LoadingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Fetched => "fetched",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cached loading state and task ids for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSlot {
    pub loading_state: LoadingState,
    pub data: Vec<TaskId>,
}

/// Slot map keyed by account.
///
/// Slots are created on first write and never removed. Reads of an account
/// that was never fetched see an idle, empty slot.
#[derive(Debug, Clone, Default)]
pub struct RequesterState {
    by_account: HashMap<AccountKey, FetchSlot>,
}

impl RequesterState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, account: &AccountKey) -> &mut FetchSlot {
        self.by_account.entry(account.clone()).or_default()
    }

    /// A fetch was issued for `account`.
    pub fn mark_loading(&mut self, account: &AccountKey) {
        self.slot_mut(account).loading_state = LoadingState::Loading;
    }

    /// A fetch for `account` completed; replaces the cached ids.
    pub fn mark_fetched(&mut self, account: &AccountKey, data: Vec<TaskId>) {
        let slot = self.slot_mut(account);
        slot.loading_state = LoadingState::Fetched;
        slot.data = data;
    }

    /// A fetch for `account` failed. Previously cached ids are kept.
    pub fn mark_failed(&mut self, account: &AccountKey) {
        self.slot_mut(account).loading_state = LoadingState::Failed;
    }

    pub fn loading_state(&self, account: &AccountKey) -> LoadingState {
        self.by_account
            .get(account)
            .map(|slot| slot.loading_state)
            .unwrap_or_default()
    }

    pub fn task_ids(&self, account: &AccountKey) -> Vec<TaskId> {
        self.by_account
            .get(account)
            .map(|slot| slot.data.clone())
            .unwrap_or_default()
    }

    pub fn slot(&self, account: &AccountKey) -> Option<&FetchSlot> {
        self.by_account.get(account)
    }

    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }
}
