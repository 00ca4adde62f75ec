use serde_json::Value;
use tickerlens_core::{ApiClient, Ticker};

use crate::cli::{BatchArgs, QuoteArgs};
use crate::error::CliError;

pub async fn single(args: &QuoteArgs, api: &ApiClient) -> Result<Value, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let quote = api.get_stock_quote(&ticker, args.detailed).await?;
    Ok(serde_json::to_value(quote)?)
}

pub async fn batch(args: &BatchArgs, api: &ApiClient) -> Result<Value, CliError> {
    let mut tickers = Vec::with_capacity(args.tickers.len());
    for raw in args.tickers.iter().flat_map(|arg| arg.split(',')) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let ticker = Ticker::parse(raw)?;
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }

    let quotes = api.get_batch_quotes(&tickers).await?;
    Ok(serde_json::to_value(quotes)?)
}
