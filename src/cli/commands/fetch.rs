//! `linguo fetch`: user-initiated requester fetch.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use super::TaskSourceArgs;
use crate::cli::output::output;
use crate::cli::{create_spinner, ProgressBarExt};
use crate::domain::models::{Config, LoadingState};

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: TaskSourceArgs,
}

pub async fn execute(args: FetchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let account = args.source.account_key();
    let client = args.source.client(config);

    let spinner = create_spinner(format!("Fetching requester tasks for {account}"), json_mode);
    let outcome = client
        .fetch_and_wait(account, Duration::from_secs(args.source.wait_secs))
        .await;

    match &outcome {
        Ok(settled) if settled.loading_state == LoadingState::Fetched => {
            spinner.finish_success(format!("{} task(s)", settled.tasks.len()));
        }
        Ok(_) => spinner.finish_error("fetch failed"),
        Err(_) => spinner.finish_error("fetch did not settle"),
    }

    let mut outcome = outcome?;
    args.source.filter(&mut outcome);
    output(&outcome, json_mode);
    Ok(())
}
