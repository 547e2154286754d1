//! Translation task domain model.
//!
//! Tasks are translation jobs posted by a requester, fulfilled by a
//! translator and optionally disputed by a challenger. Their authoritative
//! state lives on-chain; this is the read model the client caches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountKey;
use crate::domain::errors::DomainError;

/// Identifier of a task as assigned by the marketplace contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-chain status of a translation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Posted by the requester, waiting for a translator
    Created,
    /// A translator accepted the task and is working on it
    Assigned,
    /// Translation delivered, inside the review window
    AwaitingReview,
    /// A challenger disputed the delivered translation
    DisputeCreated,
    /// Task is settled
    Resolved,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Created
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::AwaitingReview => "awaiting_review",
            Self::DisputeCreated => "dispute_created",
            Self::Resolved => "resolved",
        }
    }

    /// Statuses during which the translation has not been delivered yet.
    pub fn awaits_delivery(&self) -> bool {
        matches!(self, Self::Created | Self::Assigned)
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "assigned" => Ok(Self::Assigned),
            "awaiting_review" | "awaiting-review" => Ok(Self::AwaitingReview),
            "dispute_created" | "dispute-created" | "disputed" => Ok(Self::DisputeCreated),
            "resolved" => Ok(Self::Resolved),
            _ => Err(DomainError::InvalidTaskStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship between an account and a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskParty {
    Requester,
    Translator,
    Challenger,
    Other,
}

impl std::fmt::Display for TaskParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requester => write!(f, "requester"),
            Self::Translator => write!(f, "translator"),
            Self::Challenger => write!(f, "challenger"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A translation task as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub requester: String,
    #[serde(default)]
    pub translator: Option<String>,
    #[serde(default)]
    pub challenger: Option<String>,
    pub source_language: String,
    pub target_language: String,
    pub submission_deadline: DateTime<Utc>,
}

impl Task {
    /// Create a freshly posted task.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        requester: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        submission_deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId(id),
            title: title.into(),
            status: TaskStatus::Created,
            requester: requester.into(),
            translator: None,
            challenger: None,
            source_language: source_language.into(),
            target_language: target_language.into(),
            submission_deadline,
        }
    }

    /// Resolve the party `account` plays in this task.
    ///
    /// Roles are checked requester first, so an account that both requested
    /// and translated a task is reported as the requester.
    pub fn party_for(&self, account: &AccountKey) -> TaskParty {
        let Some(account) = account.as_deref() else {
            return TaskParty::Other;
        };

        if self.requester.eq_ignore_ascii_case(account) {
            TaskParty::Requester
        } else if self
            .translator
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(account))
        {
            TaskParty::Translator
        } else if self
            .challenger
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(account))
        {
            TaskParty::Challenger
        } else {
            TaskParty::Other
        }
    }

    /// A task is incomplete once its deadline passed without a delivery.
    pub fn is_incomplete(&self, now: DateTime<Utc>) -> bool {
        self.status.awaits_delivery() && now > self.submission_deadline
    }

    /// Status label shown to users, folding expired tasks into "incomplete".
    pub fn display_status(&self, now: DateTime<Utc>) -> String {
        if self.is_incomplete(now) {
            "incomplete".to_string()
        } else {
            self.status.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(deadline: DateTime<Utc>) -> Task {
        let mut task = Task::new(7, "Whitepaper", "0xAbC", "en", "pt", deadline);
        task.translator = Some("0xdef".to_string());
        task
    }

    #[test]
    fn test_party_resolution() {
        let task = sample(Utc::now());

        assert_eq!(task.party_for(&AccountKey::from("0xabc")), TaskParty::Requester);
        assert_eq!(task.party_for(&AccountKey::from("0xDEF")), TaskParty::Translator);
        assert_eq!(task.party_for(&AccountKey::from("0x123")), TaskParty::Other);
        assert_eq!(task.party_for(&AccountKey::none()), TaskParty::Other);
    }

    #[test]
    fn test_incomplete_only_before_delivery() {
        let now = Utc::now();
        let mut task = sample(now - Duration::hours(1));

        assert!(task.is_incomplete(now));
        assert_eq!(task.display_status(now), "incomplete");

        task.status = TaskStatus::AwaitingReview;
        assert!(!task.is_incomplete(now));
        assert_eq!(task.display_status(now), "awaiting_review");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Awaiting-Review".parse::<TaskStatus>().unwrap(), TaskStatus::AwaitingReview);
        assert_eq!("disputed".parse::<TaskStatus>().unwrap(), TaskStatus::DisputeCreated);
        assert!(matches!(
            "bogus".parse::<TaskStatus>(),
            Err(DomainError::InvalidTaskStatus(_))
        ));
    }

    #[test]
    fn test_task_deserializes_with_defaults() {
        let json = r#"{
            "id": 3,
            "title": "Menu",
            "requester": "0xabc",
            "source_language": "fr",
            "target_language": "en",
            "submission_deadline": "2030-01-01T00:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(json).expect("task should parse");
        assert_eq!(task.id, TaskId(3));
        assert_eq!(task.status, TaskStatus::Created);
        assert!(task.translator.is_none());
    }
}
