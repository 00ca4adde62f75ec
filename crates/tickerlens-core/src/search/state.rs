use std::time::Duration;

use serde::Serialize;

use crate::classify::{ApiError, ErrorKind, UserAction};
use crate::domain::{SearchResult, Suggestion};

/// Tuning for the search orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub suggestion_debounce: Duration,
    /// Queries shorter than this (in characters, after trimming) never reach the network.
    pub min_query_len: usize,
    pub result_limit: u32,
    pub suggestion_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            suggestion_debounce: Duration::from_millis(100),
            min_query_len: 2,
            result_limit: 20,
            suggestion_limit: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    AwaitingDebounce,
    Loading,
    Success,
    Error,
}

/// User-facing view of a failed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFailure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<UserAction>,
}

impl From<&ApiError> for SearchFailure {
    fn from(error: &ApiError) -> Self {
        Self {
            kind: error.kind(),
            message: error.display_message(),
            action: error.suggested_action(),
        }
    }
}

/// Read-only copy of the search state handed to renderers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchSnapshot {
    /// Latest raw input, updated on every keystroke.
    pub query: String,
    /// Query of the most recent debounced fetch.
    pub debounced_query: String,
    pub results: Vec<SearchResult>,
    pub suggestions: Vec<Suggestion>,
    pub phase: SearchPhase,
    pub loading: bool,
    pub error: Option<SearchFailure>,
    /// Whether any search has completed since the last reset.
    pub has_searched: bool,
    /// Searches applied since construction, successful or not. Survives `clear`.
    pub completed_searches: u64,
    pub recent_searches: Vec<String>,
}

/// Issues monotonically increasing fetch numbers; only the newest is current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSequence {
    latest: u64,
}

impl SearchSequence {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Invalidate every issued number without starting a fetch.
    pub fn supersede(&mut self) {
        self.latest += 1;
    }

    pub const fn is_current(&self, seq: u64) -> bool {
        self.latest == seq
    }
}
