//! `linguo languages`: list target languages offered for a source language.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, LanguagePairing};

#[derive(Args, Debug)]
pub struct LanguagesArgs {
    /// Source language code; omitted lists every configured language
    #[arg(short, long)]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LanguagesOutput {
    pub source: Option<String>,
    pub targets: Vec<String>,
}

impl CommandOutput for LanguagesOutput {
    fn to_human(&self) -> String {
        if self.targets.is_empty() {
            return match &self.source {
                Some(source) => format!("No target languages are offered for {source}."),
                None => "No languages configured.".to_string(),
            };
        }

        let header = match &self.source {
            Some(source) => format!("Targets for {}:", console::style(source).bold()),
            None => "Languages:".to_string(),
        };
        let mut lines = vec![header];
        lines.extend(self.targets.iter().map(|code| format!("  {code}")));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn list(args: &LanguagesArgs, config: &Config) -> LanguagesOutput {
    let pairing = LanguagePairing::from(&config.languages);
    LanguagesOutput {
        source: args.source.clone(),
        targets: pairing
            .available_targets(args.source.as_deref())
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

pub fn execute(args: LanguagesArgs, config: &Config, json_mode: bool) -> Result<()> {
    output(&list(&args, config), json_mode);
    Ok(())
}
