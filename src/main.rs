//! Linguo CLI entry point.

use anyhow::Result;
use clap::Parser;

use linguo::cli::{Cli, Commands};
use linguo::domain::models::Config;
use linguo::infrastructure::config::ConfigLoader;
use linguo::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => linguo::cli::handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => linguo::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Fetch(args) => linguo::cli::commands::fetch::execute(args, &config, cli.json).await,
        Commands::Refresh(args) => {
            linguo::cli::commands::refresh::execute(args, &config, cli.json).await
        }
        Commands::Languages(args) => {
            linguo::cli::commands::languages::execute(args, &config, cli.json)
        }
        Commands::Config => linguo::cli::commands::config::execute(&config, cli.json),
    };

    if let Err(err) = result {
        linguo::cli::handle_error(err, cli.json);
    }
}
