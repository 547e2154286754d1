//! Command-line interface for the requester task client.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::progress::{create_spinner, ProgressBarExt};

#[derive(Parser)]
#[command(name = "linguo")]
#[command(about = "Linguo - translation task requester client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .linguo/
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the requester tasks of an account and wait for the result
    Fetch(commands::fetch::FetchArgs),

    /// Run an internal refresh of an account's requester tasks
    Refresh(commands::refresh::RefreshArgs),

    /// List the target languages offered for a source language
    Languages(commands::languages::LanguagesArgs),

    /// Show the effective configuration
    Config,
}

/// Print `err` and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
