//! Error taxonomy and the classifier that maps raw failures onto it.
//!
//! [`classify`] is a pure function: the same [`Failure`] always produces the
//! same [`ApiError`]. The transport, retry and cache layers only classify and
//! propagate; turning an error into user-facing state is left to callers.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::http_client::{HttpError, HttpErrorKind, HttpResponse};
use crate::ValidationError;

/// Closed set of error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NetworkError,
    TimeoutError,
    ValidationError,
    NotFound,
    RateLimit,
    ServerError,
    ApiError,
    UnknownError,
}

impl ErrorKind {
    pub const ALL: [Self; 8] = [
        Self::NetworkError,
        Self::TimeoutError,
        Self::ValidationError,
        Self::NotFound,
        Self::RateLimit,
        Self::ServerError,
        Self::ApiError,
        Self::UnknownError,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::TimeoutError => "TIMEOUT_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimit => "RATE_LIMIT",
            Self::ServerError => "SERVER_ERROR",
            Self::ApiError => "API_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Message used when the server did not supply one.
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NetworkError => "Unable to reach the server. Check your connection and try again.",
            Self::TimeoutError => "The request took too long to complete. Please try again.",
            Self::ValidationError => "The request was invalid. Check your input and try again.",
            Self::NotFound => "No matching data was found.",
            Self::RateLimit => "Too many requests. Please wait a moment before trying again.",
            Self::ServerError => "The server encountered an error. Please try again later.",
            Self::ApiError => "The server returned an unexpected response.",
            Self::UnknownError => "An unexpected error occurred.",
        }
    }

    /// Action a UI should offer next to the message.
    pub const fn suggested_action(self) -> Option<UserAction> {
        match self {
            Self::NetworkError | Self::TimeoutError | Self::ServerError => Some(UserAction::Retry),
            Self::NotFound => Some(UserAction::SearchAgain),
            Self::RateLimit => Some(UserAction::Wait),
            Self::ValidationError | Self::ApiError | Self::UnknownError => None,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Follow-up action offered to the user for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Retry,
    SearchAgain,
    Wait,
}

impl UserAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retry => "Try again",
            Self::SearchAgain => "Search again",
            Self::Wait => "Wait and retry",
        }
    }
}

/// Field-level validation issue reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Raw failure before classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(HttpError),

    /// A response arrived with a non-2xx status.
    #[error("upstream returned status {}", .0.status)]
    Status(HttpResponse),

    /// A 2xx body could not be decoded into the expected payload.
    #[error("undecodable response body: {message}")]
    Decode { message: String },

    /// A 2xx envelope reported `status: error` or carried no data.
    #[error("envelope reported failure: {}", message.as_deref().unwrap_or("no message"))]
    Envelope {
        message: Option<String>,
        errors: Vec<String>,
    },

    /// Arguments were rejected locally before any request was sent.
    #[error("request rejected: {0}")]
    Rejected(ValidationError),
}

/// Classified, immutable error record.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    retry_after: Option<Duration>,
    field_errors: Vec<FieldError>,
    status: Option<u16>,
    #[source]
    failure: Arc<Failure>,
}

impl ApiError {
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// HTTP status of the originating response, if one was received.
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn failure(&self) -> &Failure {
        &self.failure
    }

    pub const fn suggested_action(&self) -> Option<UserAction> {
        self.kind.suggested_action()
    }

    /// Whether the retry policy may re-issue the request.
    ///
    /// Validation, not-found and rate-limit errors, and anything answered
    /// with HTTP 400, are terminal.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::ValidationError | ErrorKind::NotFound | ErrorKind::RateLimit
        ) && self.status != Some(400)
    }

    /// Human-readable message including field issues and retry hints.
    pub fn display_message(&self) -> String {
        let mut message = self.message.clone();
        if self.kind == ErrorKind::ValidationError && !self.field_errors.is_empty() {
            let issues = self
                .field_errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            message = format!("{message} ({issues})");
        }
        if let Some(retry_after) = self.retry_after {
            message = format!("{message} Retry after {}s.", retry_after.as_secs());
        }
        message
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        classify(&Failure::Rejected(error))
    }
}

/// Map a raw failure onto the error taxonomy. First matching rule wins.
pub fn classify(failure: &Failure) -> ApiError {
    match failure {
        Failure::Transport(error) => {
            let kind = match error.kind() {
                HttpErrorKind::Timeout => ErrorKind::TimeoutError,
                HttpErrorKind::Connect | HttpErrorKind::Other => ErrorKind::NetworkError,
            };
            record(kind, None, None, Vec::new(), None, failure)
        }
        Failure::Status(response) => classify_status(response, failure),
        Failure::Decode { .. } => record(ErrorKind::UnknownError, None, None, Vec::new(), None, failure),
        Failure::Envelope { message, errors } => {
            let field_errors = errors
                .iter()
                .map(|message| FieldError {
                    field: None,
                    message: message.clone(),
                })
                .collect();
            record(
                ErrorKind::ApiError,
                None,
                message.clone(),
                field_errors,
                None,
                failure,
            )
        }
        Failure::Rejected(error) => record(
            ErrorKind::ValidationError,
            None,
            Some(error.to_string()),
            vec![FieldError {
                field: Some(error.field().to_owned()),
                message: error.to_string(),
            }],
            None,
            failure,
        ),
    }
}

fn classify_status(response: &HttpResponse, failure: &Failure) -> ApiError {
    let body = serde_json::from_str::<Value>(&response.body).ok();
    let server_message = body.as_ref().and_then(server_message);

    let kind = match response.status {
        400 => ErrorKind::ValidationError,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimit,
        500 | 502 | 503 | 504 => ErrorKind::ServerError,
        _ => ErrorKind::ApiError,
    };

    let field_errors = match (kind, &body) {
        (ErrorKind::ValidationError, Some(body)) => field_errors(body),
        _ => Vec::new(),
    };

    let retry_after = match kind {
        ErrorKind::RateLimit => response
            .header("retry-after")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs),
        _ => None,
    };

    record(
        kind,
        Some(response.status),
        server_message,
        field_errors,
        retry_after,
        failure,
    )
}

fn record(
    kind: ErrorKind,
    status: Option<u16>,
    server_message: Option<String>,
    field_errors: Vec<FieldError>,
    retry_after: Option<Duration>,
    failure: &Failure,
) -> ApiError {
    let message = server_message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| kind.user_message().to_owned());

    ApiError {
        kind,
        message,
        retry_after,
        field_errors,
        status,
        failure: Arc::new(failure.clone()),
    }
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

// Accepts `{"errors": [{"field", "message"} | "text"]}` and FastAPI's
// `{"detail": [{"loc": [...], "msg": "..."}]}`.
fn field_errors(body: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(items) = body.get("errors").and_then(Value::as_array) {
        for item in items {
            match item {
                Value::String(message) => errors.push(FieldError {
                    field: None,
                    message: message.clone(),
                }),
                Value::Object(object) => {
                    let message = object
                        .get("message")
                        .or_else(|| object.get("msg"))
                        .and_then(Value::as_str);
                    if let Some(message) = message {
                        errors.push(FieldError {
                            field: object
                                .get("field")
                                .and_then(Value::as_str)
                                .map(str::to_owned),
                            message: message.to_owned(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(items) = body.get("detail").and_then(Value::as_array) {
        for item in items {
            let Some(message) = item.get("msg").and_then(Value::as_str) else {
                continue;
            };
            let field = item
                .get("loc")
                .and_then(Value::as_array)
                .and_then(|loc| loc.last())
                .map(|segment| match segment {
                    Value::String(name) => name.clone(),
                    other => other.to_string(),
                });
            errors.push(FieldError {
                field,
                message: message.to_owned(),
            });
        }
    }

    errors
}
