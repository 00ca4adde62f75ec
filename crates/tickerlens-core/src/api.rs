//! API facade: one typed method per backend capability.
//!
//! Every read follows the same path: validate arguments locally, consult the
//! response cache, run the transport call through the retry policy, decode
//! the envelope, and store the raw body on success. Failures come back as
//! classified [`ApiError`] records and are never cached.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::cache::{CacheMode, CacheStore};
use crate::classify::{classify, ApiError, Failure};
use crate::config::AppConfig;
use crate::domain::{
    validate_search_query, BatchQuotes, Cik, CompanyDetail, FilingsList, HealthStatus,
    QueryValidation, SearchResults, StockQuote, Suggestion, SuggestionList, Ticker,
};
use crate::envelope::ApiEnvelope;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::recent::{FileStorage, RecentSearchStore};
use crate::request::{Endpoint, RequestDescriptor};
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::search::SearchBackend;
use crate::transport::Transport;
use crate::ValidationError;

/// Options for the bundled company lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    pub query: String,
    pub include_stock: bool,
    pub include_filings: bool,
    pub filings_limit: u32,
}

impl LookupOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            include_stock: true,
            include_filings: true,
            filings_limit: 5,
        }
    }
}

/// Typed client for the dashboard backend. Clones share cache and storage.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
    cache: CacheStore,
    retry: RetryConfig,
    cache_mode: CacheMode,
    recent: Option<RecentSearchStore>,
}

impl ApiClient {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            transport: Transport::new(client, base_url),
            cache: CacheStore::new(),
            retry: RetryConfig::default(),
            cache_mode: CacheMode::Use,
            recent: None,
        }
    }

    /// Production client: reqwest transport, file-backed recent searches.
    pub fn from_config(config: &AppConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
        Self::new(Arc::new(ReqwestHttpClient::new()), config.api_base_url.clone())
            .with_timeout(config.request_timeout)
            .with_retry(config.retry.clone())
            .with_recent_searches(RecentSearchStore::load(storage))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.with_timeout(timeout);
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    pub fn with_recent_searches(mut self, recent: RecentSearchStore) -> Self {
        self.recent = Some(recent);
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn recent_store(&self) -> Option<&RecentSearchStore> {
        self.recent.as_ref()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub async fn search_companies(&self, query: &str, limit: u32) -> Result<SearchResults, ApiError> {
        let query = validate_search_query(query)?;
        let limit = non_zero(limit)?;
        let descriptor = RequestDescriptor::new(Endpoint::Search, "/search")
            .param("q", &query)
            .param("limit", limit);
        self.fetch(&descriptor).await
    }

    pub async fn get_suggestions(&self, query: &str, limit: u32) -> Result<Vec<Suggestion>, ApiError> {
        let query = validate_search_query(query)?;
        let limit = non_zero(limit)?;
        let descriptor = RequestDescriptor::new(Endpoint::Suggestions, "/search/suggestions")
            .param("q", &query)
            .param("limit", limit);
        let list: SuggestionList = self.fetch(&descriptor).await?;
        Ok(list.suggestions)
    }

    /// Server-side query check. Never cached.
    pub async fn validate_query(&self, query: &str) -> Result<QueryValidation, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        let descriptor =
            RequestDescriptor::new(Endpoint::ValidateQuery, "/search/validate").param("q", query);
        self.fetch(&descriptor).await
    }

    pub async fn lookup_company(&self, options: &LookupOptions) -> Result<CompanyDetail, ApiError> {
        let query = validate_search_query(&options.query)?;
        let descriptor = RequestDescriptor::new(Endpoint::CompanyLookup, "/company/lookup")
            .param("q", &query)
            .param("include_stock", options.include_stock)
            .param("include_filings", options.include_filings)
            .param("filings_limit", options.filings_limit);
        self.fetch(&descriptor).await
    }

    pub async fn get_company_by_ticker(&self, ticker: &Ticker) -> Result<CompanyDetail, ApiError> {
        let descriptor = RequestDescriptor::new(
            Endpoint::CompanyByTicker,
            format!("/company/{}", urlencoding::encode(ticker.as_str())),
        );
        self.fetch(&descriptor).await
    }

    pub async fn get_stock_quote(&self, ticker: &Ticker, detailed: bool) -> Result<StockQuote, ApiError> {
        let descriptor = RequestDescriptor::new(
            Endpoint::StockQuote,
            format!("/stock/{}", urlencoding::encode(ticker.as_str())),
        )
        .param("detailed", detailed);
        self.fetch(&descriptor).await
    }

    /// Quotes for several tickers at once. Always fetched fresh.
    pub async fn get_batch_quotes(&self, tickers: &[Ticker]) -> Result<BatchQuotes, ApiError> {
        if tickers.is_empty() {
            return Err(ValidationError::EmptyTickerList.into());
        }
        let joined = tickers
            .iter()
            .map(Ticker::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let descriptor =
            RequestDescriptor::new(Endpoint::BatchQuotes, "/stock/batch").param("tickers", joined);
        self.fetch(&descriptor).await
    }

    pub async fn get_filings(
        &self,
        cik: &Cik,
        limit: u32,
        form_types: &[String],
    ) -> Result<FilingsList, ApiError> {
        let limit = non_zero(limit)?;
        let mut descriptor =
            RequestDescriptor::new(Endpoint::Filings, format!("/filings/{}", cik.padded()))
                .param("limit", limit);
        let form_types = form_types
            .iter()
            .map(|form| form.trim())
            .filter(|form| !form.is_empty())
            .collect::<Vec<_>>();
        if !form_types.is_empty() {
            descriptor = descriptor.param("form_types", form_types.join(","));
        }
        self.fetch(&descriptor).await
    }

    /// Liveness probe. The body is a bare `{status}` object, not an envelope.
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let descriptor = RequestDescriptor::new(Endpoint::Health, "/health/simple");
        let response = self.send_with_retry(&descriptor).await?;
        serde_json::from_str(&response).map_err(|error| {
            classify(&Failure::Decode {
                message: error.to_string(),
            })
        })
    }

    /// Drop cached company and quote entries for `ticker`.
    pub async fn invalidate_company(&self, ticker: &Ticker) -> usize {
        let encoded = urlencoding::encode(ticker.as_str()).into_owned();
        let prefixes = [
            format!("{}:/company/{encoded}?", Endpoint::CompanyByTicker),
            format!("{}:/stock/{encoded}?", Endpoint::StockQuote),
        ];

        let mut removed = 0;
        for prefix in &prefixes {
            removed += self.cache.invalidate_prefix(prefix).await;
        }
        tracing::debug!(ticker = %ticker, removed, "invalidated cached company entries");
        removed
    }

    /// Remember a successful query. A no-op without a configured store.
    pub fn record_recent_search(&self, query: &str) -> Vec<String> {
        let Some(recent) = &self.recent else {
            return Vec::new();
        };
        match recent.record(query) {
            Ok(list) => list,
            Err(error) => {
                tracing::warn!(error = %error, "failed to persist recent search");
                recent.list()
            }
        }
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.recent
            .as_ref()
            .map(RecentSearchStore::list)
            .unwrap_or_default()
    }

    pub fn clear_recent_searches(&self) {
        if let Some(recent) = &self.recent {
            if let Err(error) = recent.clear() {
                tracing::warn!(error = %error, "failed to clear recent searches");
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T, ApiError> {
        let key = descriptor.cache_key();
        let ttl = descriptor.cache.ttl();

        if ttl.is_some() && self.cache_mode.reads() {
            if let Some(body) = self.cache.get(&key).await {
                match ApiEnvelope::<T>::parse(&body).and_then(ApiEnvelope::into_result) {
                    Ok(data) => {
                        tracing::debug!(key = %key, "cache hit");
                        return Ok(data);
                    }
                    Err(error) => {
                        tracing::warn!(key = %key, error = %error, "dropping undecodable cache entry");
                        self.cache.invalidate(&key).await;
                    }
                }
            }
        }

        let body = self.send_with_retry(descriptor).await?;
        let envelope = ApiEnvelope::<T>::parse(&body).map_err(|failure| classify(&failure))?;
        let cacheable = envelope.status.is_cacheable();
        if let Some(message) = &envelope.message {
            tracing::info!(
                endpoint = %descriptor.endpoint,
                status = ?envelope.status,
                notice = %message,
                "backend returned a notice"
            );
        }
        let data = envelope.into_result().map_err(|failure| classify(&failure))?;

        if let Some(ttl) = ttl {
            if cacheable && self.cache_mode.writes() {
                self.cache.put(key, body, ttl).await;
            }
        }

        Ok(data)
    }

    async fn send_with_retry(&self, descriptor: &RequestDescriptor) -> Result<String, ApiError> {
        retry_with_backoff(&self.retry, ApiError::is_retryable, |attempt| async move {
            if attempt > 1 {
                tracing::debug!(attempt, endpoint = %descriptor.endpoint, "retrying request");
            }
            self.transport
                .send(descriptor)
                .await
                .map(|response| response.body)
                .map_err(|failure| classify(&failure))
        })
        .await
    }
}

fn non_zero(limit: u32) -> Result<u32, ValidationError> {
    if limit == 0 {
        Err(ValidationError::ZeroLimit)
    } else {
        Ok(limit)
    }
}

impl SearchBackend for ApiClient {
    fn search<'a>(
        &'a self,
        query: String,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<SearchResults, ApiError>> + Send + 'a>> {
        Box::pin(async move { self.search_companies(&query, limit).await })
    }

    fn suggest<'a>(
        &'a self,
        query: String,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Suggestion>, ApiError>> + Send + 'a>> {
        Box::pin(async move { self.get_suggestions(&query, limit).await })
    }
}
