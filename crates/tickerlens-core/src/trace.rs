use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Per-request identifier (UUID v4), sent as `x-request-id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// 32-hex trace identifier, sent as `x-trace-id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TraceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity and start time of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrace {
    pub request_id: RequestId,
    pub trace_id: TraceId,
    pub started_at: OffsetDateTime,
}

impl RequestTrace {
    pub fn start() -> Self {
        Self {
            request_id: RequestId::new_v4(),
            trace_id: TraceId::new(),
            started_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn started_at_rfc3339(&self) -> String {
        self.started_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.started_at.unix_timestamp().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_id_is_32_hex_chars() {
        let trace_id = TraceId::new();
        assert_eq!(trace_id.as_str().len(), 32);
        assert!(trace_id.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn each_trace_gets_fresh_ids() {
        let a = RequestTrace::start();
        let b = RequestTrace::start();
        assert_ne!(a.request_id, b.request_id);
        assert_ne!(a.trace_id, b.trace_id);
        assert_eq!(a.request_id.to_string().len(), 36);
    }

    #[test]
    fn start_time_formats_as_rfc3339() {
        let trace = RequestTrace::start();
        let formatted = trace.started_at_rfc3339();
        assert!(OffsetDateTime::parse(&formatted, &Rfc3339).is_ok());
    }
}
