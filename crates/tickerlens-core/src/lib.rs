//! Core client layer for tickerlens.
//!
//! This crate contains:
//! - Validated identifiers and typed backend payloads
//! - HTTP transport with default headers, tracing ids and a hard timeout
//! - Error classification into a closed taxonomy
//! - Retry with exponential backoff and a TTL response cache
//! - The [`ApiClient`] facade composing the above
//! - A debounced search orchestrator and the persisted recent-search list

pub mod api;
pub mod cache;
pub mod classify;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod recent;
pub mod request;
pub mod retry;
pub mod search;
pub mod trace;
pub mod transport;

pub use api::{ApiClient, LookupOptions};
pub use cache::{
    CacheMode, CachePolicy, CacheStats, CacheStore, CacheTtl, Clock, ManualClock, SystemClock,
};
pub use classify::{classify, ApiError, ErrorKind, Failure, FieldError, UserAction};
pub use config::{AppConfig, ConfigError, Environment};
pub use domain::{
    normalize_query, validate_search_query, BatchQuotes, Cik, CompanyDetail, CompanyProfile, Filing, FilingsList,
    HealthStatus, InvestmentAnalysis, QueryValidation, SearchResult, SearchResults, StockQuote,
    Suggestion, SuggestionList, Ticker, MAX_QUERY_LEN,
};
pub use envelope::{ApiEnvelope, ResponseStatus};
pub use error::{StorageError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use recent::{
    FileStorage, KeyValueStorage, MemoryStorage, RecentSearchStore, MAX_RECENT_SEARCHES,
    RECENT_SEARCHES_KEY,
};
pub use request::{Endpoint, RequestDescriptor};
pub use retry::{retry_with_backoff, Backoff, RetryConfig};
pub use search::{
    Debouncer, SearchBackend, SearchConfig, SearchFailure, SearchOrchestrator, SearchPhase,
    SearchSequence, SearchSnapshot,
};
pub use trace::{RequestId, RequestTrace, TraceId};
pub use transport::Transport;
