pub mod config;
pub mod fetch;
pub mod languages;
pub mod refresh;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::adapters::file_provider::FileTaskProvider;
use crate::application::{LinguoClient, RequesterOutcome};
use crate::cli::output::table::{format_tasks, styled_loading_state};
use crate::cli::output::CommandOutput;
use crate::domain::models::{AccountKey, Config, TaskStatus};

/// Arguments shared by commands that read tasks and wait for a result.
#[derive(Args, Debug, Clone)]
pub struct TaskSourceArgs {
    /// JSON or YAML file holding the task list
    #[arg(short, long)]
    pub tasks: PathBuf,

    /// Account to fetch for; omitted means no connected account
    #[arg(short, long)]
    pub account: Option<String>,

    /// Seconds to wait for the fetch to settle
    #[arg(long, default_value = "30")]
    pub wait_secs: u64,

    /// Only show tasks with this status (e.g. assigned, awaiting_review)
    #[arg(short, long)]
    pub status: Option<TaskStatus>,
}

impl TaskSourceArgs {
    pub fn account_key(&self) -> AccountKey {
        AccountKey::from(self.account.clone())
    }

    /// Start a client backed by the task file.
    pub fn client(&self, config: &Config) -> LinguoClient {
        let provider = FileTaskProvider::new(self.tasks.clone());
        LinguoClient::start(config, Arc::new(provider))
    }

    /// Drop tasks not matching `--status`. The slot itself is untouched.
    pub fn filter(&self, outcome: &mut RequesterOutcome) {
        if let Some(status) = self.status {
            outcome.tasks.retain(|task| task.status == status);
        }
    }
}

impl CommandOutput for RequesterOutcome {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Account: {}  State: {}  Key: {}",
            self.account,
            styled_loading_state(self.loading_state),
            self.key
        )];

        if let Some(error) = &self.error {
            lines.push(format!("{} {error}", console::style("Fetch failed:").red()));
        }

        if self.tasks.is_empty() {
            lines.push("No tasks.".to_string());
        } else {
            lines.push(format_tasks(&self.tasks, &self.account, chrono::Utc::now()));
        }

        if let Some(navigation) = &self.navigation {
            lines.push(format!(
                "{} ({})",
                console::style(&navigation.message).cyan(),
                navigation.route
            ));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
