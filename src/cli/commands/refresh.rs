//! `linguo refresh`: internal refresh, never navigates.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use super::TaskSourceArgs;
use crate::cli::output::output;
use crate::cli::{create_spinner, ProgressBarExt};
use crate::domain::models::{Config, LoadingState};

#[derive(Args, Debug)]
pub struct RefreshArgs {
    #[command(flatten)]
    pub source: TaskSourceArgs,
}

pub async fn execute(args: RefreshArgs, config: &Config, json_mode: bool) -> Result<()> {
    let account = args.source.account_key();
    let client = args.source.client(config);

    let spinner = create_spinner(format!("Refreshing requester tasks for {account}"), json_mode);
    let outcome = client
        .refresh_and_wait(account, Duration::from_secs(args.source.wait_secs))
        .await;

    match &outcome {
        Ok(settled) if settled.loading_state == LoadingState::Fetched => {
            spinner.finish_success(format!("{} task(s)", settled.tasks.len()));
        }
        Ok(_) => spinner.finish_error("refresh failed"),
        Err(_) => spinner.finish_error("refresh did not settle"),
    }

    let mut outcome = outcome?;
    args.source.filter(&mut outcome);
    output(&outcome, json_mode);
    Ok(())
}
