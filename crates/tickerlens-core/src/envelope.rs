use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::Failure;

/// Outcome reported by the backend for a 2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    Warning,
    Partial,
}

impl ResponseStatus {
    /// Whether a body with this status may be stored in the response cache.
    pub const fn is_cacheable(self) -> bool {
        matches!(self, Self::Success | Self::Warning)
    }
}

/// Backend response envelope: `{status, data, message?, errors?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: ResponseStatus,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    pub fn parse(body: &str) -> Result<Self, Failure> {
        serde_json::from_str(body).map_err(|error| Failure::Decode {
            message: error.to_string(),
        })
    }
}

impl<T> ApiEnvelope<T> {
    /// `Ok(data)` for success/warning/partial bodies that carry data.
    pub fn into_result(self) -> Result<T, Failure> {
        match (self.status, self.data) {
            (ResponseStatus::Error, _) | (_, None) => Err(Failure::Envelope {
                message: self.message,
                errors: self.errors.iter().map(error_text).collect(),
            }),
            (_, Some(data)) => Ok(data),
        }
    }
}

fn error_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(object) => {
            let message = object
                .get("message")
                .or_else(|| object.get("msg"))
                .and_then(Value::as_str);
            match (object.get("field").and_then(Value::as_str), message) {
                (Some(field), Some(message)) => format!("{field}: {message}"),
                (None, Some(message)) => message.to_owned(),
                _ => value.to_string(),
            }
        }
        other => other.to_string(),
    }
}
