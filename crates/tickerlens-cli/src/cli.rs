//! CLI argument definitions for tickerlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search companies by name or ticker |
//! | `suggest` | Type-ahead suggestions for a partial query |
//! | `validate` | Ask the backend whether a query is acceptable |
//! | `lookup` | Bundled company detail (profile, quote, filings, analysis) |
//! | `company` | Company detail by ticker |
//! | `quote` | Latest stock quote |
//! | `batch` | Quotes for several tickers |
//! | `filings` | Recent regulatory filings for a CIK |
//! | `health` | Backend liveness probe |
//! | `recent` | Show or clear recent searches |
//! | `interactive` | Debounced search session fed from stdin |
//!
//! # Examples
//!
//! ```bash
//! tickerlens search tesla --limit 5 --pretty
//! tickerlens filings 320193 --form-type 10-K --form-type 10-Q
//! TICKERLENS_ENV=production TICKERLENS_API_BASE_URL=https://api.example.com/api/v1 tickerlens health
//! ```

use clap::{Args, Parser, Subcommand};
use tickerlens_core::CacheMode;

/// Company research dashboard client.
#[derive(Debug, Parser)]
#[command(
    name = "tickerlens",
    author,
    version,
    about = "Search companies and fetch quotes, filings and analysis from the tickerlens backend"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Backend base URL; overrides TICKERLENS_API_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds; overrides TICKERLENS_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Verbose logging to stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Neither read nor write the response cache.
    #[arg(long, global = true, default_value_t = false, conflicts_with = "refresh")]
    pub no_cache: bool,

    /// Skip cached responses but store fresh ones.
    #[arg(long, global = true, default_value_t = false)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn cache_mode(&self) -> CacheMode {
        if self.no_cache {
            CacheMode::Bypass
        } else if self.refresh {
            CacheMode::Refresh
        } else {
            CacheMode::Use
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search companies by name, ticker or keyword.
    ///
    ///   tickerlens search apple
    ///   tickerlens search "berkshire hathaway" --limit 5
    Search(SearchArgs),

    /// Type-ahead suggestions for a partial query.
    Suggest(SuggestArgs),

    /// Server-side validation of a search query.
    Validate(ValidateArgs),

    /// Full company detail: profile, quote, filings and AI summary.
    Lookup(LookupArgs),

    /// Company detail by ticker.
    Company(TickerArgs),

    /// Latest stock quote for a ticker.
    Quote(QuoteArgs),

    /// Quotes for several tickers in one request (never cached).
    Batch(BatchArgs),

    /// Recent regulatory filings for a CIK.
    Filings(FilingsArgs),

    /// Backend liveness probe.
    Health,

    /// Show, remove or clear recent searches.
    Recent(RecentArgs),

    /// Debounced search session: each stdin line is treated as the current input.
    ///
    /// Lines starting with `!` search immediately. `:clear` resets the session,
    /// `:recent` prints recent searches and `:q` quits.
    Interactive,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,

    #[arg(long, default_value_t = 20)]
    pub limit: u32,

    /// Do not add the query to the recent-search list.
    #[arg(long, default_value_t = false)]
    pub no_record: bool,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    pub query: String,

    #[arg(long, default_value_t = 8)]
    pub limit: u32,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    pub query: String,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Company name or ticker.
    pub query: String,

    #[arg(long, default_value_t = false)]
    pub no_stock: bool,

    #[arg(long, default_value_t = false)]
    pub no_filings: bool,

    #[arg(long, default_value_t = 5)]
    pub filings_limit: u32,
}

#[derive(Debug, Args)]
pub struct TickerArgs {
    pub ticker: String,

    /// Drop cached entries for this ticker before fetching.
    #[arg(long, default_value_t = false)]
    pub invalidate: bool,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    pub ticker: String,

    /// Include extended fields (52-week range, P/E).
    #[arg(long, default_value_t = false)]
    pub detailed: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FilingsArgs {
    /// SEC Central Index Key, with or without leading zeros.
    pub cik: String,

    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Restrict to a form type; repeatable (e.g. 10-K, 10-Q, 8-K).
    #[arg(long = "form-type")]
    pub form_types: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RecentArgs {
    /// Remove every recent search.
    #[arg(long, default_value_t = false, conflicts_with = "remove")]
    pub clear: bool,

    /// Remove a single query.
    #[arg(long)]
    pub remove: Option<String>,
}
