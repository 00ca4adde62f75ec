use serde_json::{json, Value};
use tickerlens_core::{normalize_query, ApiClient};

use crate::cli::{SearchArgs, SuggestArgs, ValidateArgs};
use crate::error::CliError;

pub async fn search(args: &SearchArgs, api: &ApiClient) -> Result<Value, CliError> {
    let found = api.search_companies(&args.query, args.limit).await?;

    if !args.no_record && !found.results.is_empty() {
        api.record_recent_search(&normalize_query(&args.query));
    }

    Ok(serde_json::to_value(found)?)
}

pub async fn suggest(args: &SuggestArgs, api: &ApiClient) -> Result<Value, CliError> {
    let suggestions = api.get_suggestions(&args.query, args.limit).await?;
    Ok(json!({
        "query": normalize_query(&args.query),
        "suggestions": suggestions,
    }))
}

pub async fn validate(args: &ValidateArgs, api: &ApiClient) -> Result<Value, CliError> {
    let verdict = api.validate_query(&args.query).await?;
    Ok(serde_json::to_value(verdict)?)
}
