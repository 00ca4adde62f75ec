use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::cache::{CachePolicy, CacheTtl};

/// Backend operation a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Search,
    Suggestions,
    ValidateQuery,
    CompanyLookup,
    CompanyByTicker,
    StockQuote,
    BatchQuotes,
    Filings,
    Health,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Suggestions => "suggestions",
            Self::ValidateQuery => "validate_query",
            Self::CompanyLookup => "company_lookup",
            Self::CompanyByTicker => "company_by_ticker",
            Self::StockQuote => "stock_quote",
            Self::BatchQuotes => "batch_quotes",
            Self::Filings => "filings",
            Self::Health => "health",
        }
    }

    /// Cache policy used when a descriptor does not override it.
    pub const fn default_cache(self) -> CachePolicy {
        match self {
            Self::Search | Self::Suggestions => CachePolicy::Cached(CacheTtl::Search),
            Self::CompanyLookup | Self::CompanyByTicker => CachePolicy::Cached(CacheTtl::Company),
            Self::StockQuote => CachePolicy::Cached(CacheTtl::Quote),
            Self::Filings => CachePolicy::Cached(CacheTtl::Filings),
            Self::ValidateQuery | Self::BatchQuotes | Self::Health => CachePolicy::Bypass,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound read: where it goes, with which parameters, and whether its
/// response may be cached. Parameters are kept sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub endpoint: Endpoint,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub cache: CachePolicy,
}

impl RequestDescriptor {
    pub fn new(endpoint: Endpoint, path: impl Into<String>) -> Self {
        Self {
            endpoint,
            path: path.into(),
            params: BTreeMap::new(),
            cache: endpoint.default_cache(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    /// Identity for caching: endpoint, path and sorted `key=value` pairs.
    pub fn cache_key(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}:{}?{}", self.endpoint, self.path, params)
    }

    /// Percent-encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
