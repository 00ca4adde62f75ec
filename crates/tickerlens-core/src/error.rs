use thiserror::Error;

/// Validation errors raised while parsing user-supplied identifiers and queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("cik cannot be empty")]
    EmptyCik,
    #[error("cik must contain only digits: '{value}'")]
    CikNotNumeric { value: String },
    #[error("cik length {len} exceeds max {max}")]
    CikTooLong { len: usize, max: usize },

    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("search query length {len} exceeds max {max}")]
    QueryTooLong { len: usize, max: usize },
    #[error("search query contains invalid character {ch:?}")]
    QueryInvalidChar { ch: char },

    #[error("limit must be greater than zero")]
    ZeroLimit,
    #[error("at least one ticker is required")]
    EmptyTickerList,
}

impl ValidationError {
    /// Name of the request field the error refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTicker
            | Self::TickerTooLong { .. }
            | Self::TickerInvalidStart { .. }
            | Self::TickerInvalidChar { .. } => "ticker",
            Self::EmptyTickerList => "tickers",
            Self::EmptyCik | Self::CikNotNumeric { .. } | Self::CikTooLong { .. } => "cik",
            Self::EmptyQuery | Self::QueryTooLong { .. } | Self::QueryInvalidChar { .. } => "q",
            Self::ZeroLimit => "limit",
        }
    }
}

/// Errors raised by persistent key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
