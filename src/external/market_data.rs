use async_trait::async_trait;
use thiserror::Error;

use crate::models::PriceBar;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("symbol not found")]
    NotFound,
}

/// A remote source of daily bars, queried by symbol and a range such as `1mo`.
///
/// Implementations return bars oldest first. They are free to fail; callers
/// treat every source as unreliable.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}
