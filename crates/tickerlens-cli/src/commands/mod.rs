mod company;
mod filings;
mod interactive;
mod quote;
mod recent;
mod search;

use serde_json::Value;
use tickerlens_core::{ApiClient, AppConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Runs the selected command. Commands that print their own output (the
/// interactive session) return `None`.
pub async fn run(cli: &Cli, api: &ApiClient, config: &AppConfig) -> Result<Option<Value>, CliError> {
    let data = match &cli.command {
        Command::Search(args) => search::search(args, api).await?,
        Command::Suggest(args) => search::suggest(args, api).await?,
        Command::Validate(args) => search::validate(args, api).await?,
        Command::Lookup(args) => company::lookup(args, api).await?,
        Command::Company(args) => company::by_ticker(args, api).await?,
        Command::Quote(args) => quote::single(args, api).await?,
        Command::Batch(args) => quote::batch(args, api).await?,
        Command::Filings(args) => filings::run(args, api).await?,
        Command::Health => health(api).await?,
        Command::Recent(args) => recent::run(args, api)?,
        Command::Interactive => {
            interactive::run(api, config, cli.pretty).await?;
            return Ok(None);
        }
    };

    Ok(Some(data))
}

async fn health(api: &ApiClient) -> Result<Value, CliError> {
    let status = api.health_check().await?;
    Ok(serde_json::json!({
        "base_url": api.base_url(),
        "status": status.status,
        "healthy": status.is_healthy(),
    }))
}
