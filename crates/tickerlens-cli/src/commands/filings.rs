use serde_json::Value;
use tickerlens_core::{ApiClient, Cik};

use crate::cli::FilingsArgs;
use crate::error::CliError;

pub async fn run(args: &FilingsArgs, api: &ApiClient) -> Result<Value, CliError> {
    let cik = Cik::parse(&args.cik)?;
    let form_types = args
        .form_types
        .iter()
        .map(|form| form.trim().to_ascii_uppercase())
        .collect::<Vec<_>>();

    let filings = api.get_filings(&cik, args.limit, &form_types).await?;
    Ok(serde_json::to_value(filings)?)
}
