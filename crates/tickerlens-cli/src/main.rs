mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tickerlens_core::config::ENV_API_BASE_URL;
use tickerlens_core::{logging, ApiClient, AppConfig};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(CliError::Api(error)) => {
            eprintln!("{}", output::describe_api_error(&error));
            ExitCode::from(CliError::Api(error).exit_code())
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config);

    let api = ApiClient::from_config(&config).with_cache_mode(cli.cache_mode());
    tracing::debug!(
        cache_mode = ?cli.cache_mode(),
        timeout_ms = u64::try_from(config.request_timeout.as_millis()).unwrap_or(u64::MAX),
        "client ready"
    );

    if let Some(data) = commands::run(&cli, &api, &config).await? {
        output::render(&data, cli.pretty)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::from_lookup(|name| {
        if name == ENV_API_BASE_URL {
            if let Some(url) = &cli.base_url {
                return Some(url.clone());
            }
        }
        std::env::var(name).ok()
    })?;

    if let Some(timeout_ms) = cli.timeout_ms {
        if timeout_ms == 0 {
            return Err(CliError::Usage(String::from(
                "--timeout-ms must be greater than zero",
            )));
        }
        config.request_timeout = Duration::from_millis(timeout_ms);
    }
    if cli.debug {
        config.debug = true;
    }

    Ok(config)
}
