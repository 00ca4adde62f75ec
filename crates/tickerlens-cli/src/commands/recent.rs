use serde_json::{json, Value};
use tickerlens_core::ApiClient;

use crate::cli::RecentArgs;
use crate::error::CliError;

pub fn run(args: &RecentArgs, api: &ApiClient) -> Result<Value, CliError> {
    let Some(store) = api.recent_store() else {
        return Ok(json!({ "recent_searches": [] }));
    };

    if args.clear {
        store.clear()?;
    } else if let Some(query) = &args.remove {
        store.remove(query)?;
    }

    Ok(json!({ "recent_searches": store.list() }))
}
