use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One ranked match returned by company search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(alias = "symbol")]
    pub ticker: String,
    #[serde(alias = "company_name", alias = "title")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cik: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default, alias = "relevance_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub match_type: Option<String>,
}

/// Search payload (`data` of `GET /search`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, alias = "total_results")]
    pub total: Option<u64>,
}

/// Type-ahead suggestion.
///
/// The backend sends either bare strings or objects; both shapes deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSuggestion")]
pub struct Suggestion {
    pub text: String,
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Text(String),
    Object {
        #[serde(default, alias = "suggestion", alias = "value")]
        text: Option<String>,
        #[serde(default, alias = "symbol")]
        ticker: Option<String>,
        #[serde(default, alias = "company_name")]
        name: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

impl From<RawSuggestion> for Suggestion {
    fn from(value: RawSuggestion) -> Self {
        match value {
            RawSuggestion::Text(text) => Self {
                text,
                ticker: None,
                name: None,
                kind: None,
            },
            RawSuggestion::Object {
                text,
                ticker,
                name,
                kind,
            } => {
                let text = text.unwrap_or_else(|| match (&ticker, &name) {
                    (Some(ticker), Some(name)) => format!("{ticker} - {name}"),
                    (Some(ticker), None) => ticker.clone(),
                    (None, Some(name)) => name.clone(),
                    (None, None) => String::new(),
                });
                Self {
                    text,
                    ticker,
                    name,
                    kind,
                }
            }
        }
    }
}

/// Suggestions payload (`data` of `GET /search/suggestions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// Server-side query validation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Company profile section of a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(alias = "company_name", alias = "title")]
    pub name: String,
    #[serde(default, alias = "symbol")]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cik: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub employees: Option<u64>,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Latest stock quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    #[serde(alias = "symbol")]
    pub ticker: String,
    #[serde(alias = "current_price")]
    pub price: f64,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default, alias = "day_high")]
    pub high: Option<f64>,
    #[serde(default, alias = "day_low")]
    pub low: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Batch quote payload keyed by ticker; per-ticker failures land in `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchQuotes {
    #[serde(default)]
    pub quotes: BTreeMap<String, StockQuote>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

/// Regulatory filing summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    #[serde(alias = "accessionNumber")]
    pub accession_number: String,
    #[serde(alias = "form")]
    pub form_type: String,
    #[serde(alias = "filingDate")]
    pub filing_date: String,
    #[serde(default, alias = "reportDate")]
    pub report_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "filing_url")]
    pub url: Option<String>,
}

/// Filings payload (`data` of `GET /filings/{cik}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingsList {
    #[serde(default, deserialize_with = "string_or_number")]
    pub cik: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub filings: Vec<Filing>,
    #[serde(default, alias = "total_count")]
    pub total: Option<u64>,
}

/// AI-generated educational summary. Not investment advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default, alias = "confidence_score")]
    pub confidence: Option<f64>,
    #[serde(default, alias = "key_strengths")]
    pub strengths: Vec<String>,
    #[serde(default, alias = "key_risks")]
    pub risks: Vec<String>,
    #[serde(default)]
    pub considerations: Vec<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

/// Bundled company lookup: profile, quote, filings and analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    pub company: CompanyProfile,
    #[serde(default)]
    pub stock_quote: Option<StockQuote>,
    #[serde(default)]
    pub recent_filings: Vec<Filing>,
    #[serde(default)]
    pub investment_analysis: Option<InvestmentAnalysis>,
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Liveness probe body (`GET /health/simple`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok" | "success")
    }
}

// CIKs arrive as either JSON numbers or strings depending on the upstream source.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        Some(Value::Number(value)) => Some(value.to_string()),
        _ => None,
    })
}
