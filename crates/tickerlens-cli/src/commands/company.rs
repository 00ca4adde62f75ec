use serde_json::Value;
use tickerlens_core::{ApiClient, LookupOptions, Ticker};

use crate::cli::{LookupArgs, TickerArgs};
use crate::error::CliError;

pub async fn lookup(args: &LookupArgs, api: &ApiClient) -> Result<Value, CliError> {
    let options = LookupOptions {
        include_stock: !args.no_stock,
        include_filings: !args.no_filings,
        filings_limit: args.filings_limit,
        ..LookupOptions::new(args.query.as_str())
    };
    let detail = api.lookup_company(&options).await?;
    Ok(serde_json::to_value(detail)?)
}

pub async fn by_ticker(args: &TickerArgs, api: &ApiClient) -> Result<Value, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    if args.invalidate {
        api.invalidate_company(&ticker).await;
    }
    let detail = api.get_company_by_ticker(&ticker).await?;
    Ok(serde_json::to_value(detail)?)
}
