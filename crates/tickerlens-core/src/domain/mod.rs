//! # Domain Models
//!
//! Typed payloads for every backend endpoint plus the validated identifiers
//! used to build requests.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated exchange ticker |
//! | [`Cik`] | SEC Central Index Key |
//! | [`SearchResult`] | One ranked company search match |
//! | [`Suggestion`] | Type-ahead suggestion |
//! | [`CompanyDetail`] | Profile, quote, filings and analysis bundle |
//! | [`StockQuote`] | Latest quote for one ticker |
//! | [`FilingsList`] | Recent regulatory filings for a CIK |
//!
//! Payload structs ignore unknown fields and default optional ones, so a
//! backend that adds fields does not break decoding while a backend that
//! renames a required field fails loudly instead of rendering blanks.

mod cik;
mod models;
mod query;
mod ticker;

pub use cik::Cik;
pub use models::{
    BatchQuotes, CompanyDetail, CompanyProfile, Filing, FilingsList, HealthStatus,
    InvestmentAnalysis, QueryValidation, SearchResult, SearchResults, StockQuote, Suggestion,
    SuggestionList,
};
pub use query::{normalize_query, validate_search_query, MAX_QUERY_LEN};
pub use ticker::Ticker;
