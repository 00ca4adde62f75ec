use std::sync::Arc;
use std::time::Duration;

use crate::classify::Failure;
use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::request::RequestDescriptor;
use crate::trace::RequestTrace;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound adapter: turns a [`RequestDescriptor`] into one HTTP exchange
/// with default headers, tracing metadata and a hard timeout.
#[derive(Clone)]
pub struct Transport {
    client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url_for(&self, descriptor: &RequestDescriptor) -> String {
        let query = descriptor.query_string();
        if query.is_empty() {
            format!("{}{}", self.base_url, descriptor.path)
        } else {
            format!("{}{}?{}", self.base_url, descriptor.path, query)
        }
    }

    /// Issue one request. Non-2xx responses come back as [`Failure::Status`].
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, Failure> {
        let trace = RequestTrace::start();
        let request = HttpRequest::get(self.url_for(descriptor))
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json")
            .with_header("x-request-id", trace.request_id.to_string())
            .with_header("x-trace-id", trace.trace_id.as_str())
            .with_timeout(self.timeout);
        let method = request.method.as_str();

        tracing::debug!(
            method,
            path = %descriptor.path,
            endpoint = %descriptor.endpoint,
            request_id = %trace.request_id,
            started_at = %trace.started_at_rfc3339(),
            "sending request"
        );

        let started = tokio::time::Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, self.client.execute(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(HttpError::timeout(format!(
                "request exceeded {} ms",
                self.timeout.as_millis()
            ))),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    method,
                    path = %descriptor.path,
                    status = response.status,
                    duration_ms,
                    request_id = %trace.request_id,
                    "request succeeded"
                );
                Ok(response)
            }
            Ok(response) => {
                tracing::warn!(
                    method,
                    path = %descriptor.path,
                    status = response.status,
                    duration_ms,
                    request_id = %trace.request_id,
                    "request returned error status"
                );
                Err(Failure::Status(response))
            }
            Err(error) => {
                tracing::warn!(
                    method,
                    path = %descriptor.path,
                    duration_ms,
                    request_id = %trace.request_id,
                    error = %error,
                    "request failed without response"
                );
                Err(Failure::Transport(error))
            }
        }
    }
}
