//! Error taxonomy for the fetch, transform and render steps.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The exchange could not be reached, timed out, or dropped the connection.
    #[error("exchange unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("exchange rate limit hit (HTTP {status}), retry after {retry_after_secs:?}s")]
    RateLimited {
        status: u16,
        retry_after_secs: Option<u64>,
    },

    #[error("exchange returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("no {quote} trading pair found for {ticker}")]
    SymbolNotFound { ticker: String, quote: String },

    #[error("unexpected exchange payload: {0}")]
    Decode(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid option catalog: {0}")]
    Catalog(String),
}

impl DashboardError {
    /// Short machine-readable tag, used by the UI to pick an error style.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::RateLimited { .. } => "rate_limited",
            Self::Api { .. } => "exchange_api",
            Self::SymbolNotFound { .. } => "symbol_not_found",
            Self::Decode(_) => "decode",
            Self::InvalidSelection(_) => "invalid_selection",
            Self::Catalog(_) => "catalog",
        }
    }

    /// True for failures of the exchange connection itself (NetworkError class).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimited { .. })
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
