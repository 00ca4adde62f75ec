use serde::Serialize;
use tickerlens_core::ApiError;

use crate::error::CliError;

pub fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), CliError> {
    println!("{}", to_json(value, pretty)?);
    Ok(())
}

pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(payload)
}

/// Stderr report for a classified API failure.
pub fn describe_api_error(error: &ApiError) -> String {
    let mut lines = vec![format!("error: {}: {}", error.kind(), error.display_message())];
    if let Some(status) = error.status() {
        lines.push(format!("status: {status}"));
    }
    if let Some(action) = error.suggested_action() {
        lines.push(format!("hint: {}", action.label()));
    }
    lines.join("\n")
}
