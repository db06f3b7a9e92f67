use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{AppConfig, SyntheticConfig};
use crate::external::{MarketDataError, MarketDataProvider};
use crate::models::PriceBar;
use crate::services::synthetic;

/// Where a set of bars came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Live { symbol: String },
    /// Every live attempt failed; `reason` describes the last failure.
    Synthetic { reason: String },
}

impl DataSource {
    pub fn is_live(&self) -> bool {
        matches!(self, DataSource::Live { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Live { .. } => "live",
            DataSource::Synthetic { .. } => "synthetic",
        }
    }
}

/// Bars returned by [`DataProvider::fetch`]. `bars` is never empty.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

/// Fetches recent daily bars for one instrument.
///
/// Strategy:
/// 1. Try each symbol alias in order, each attempt bounded by `timeout`
/// 2. Drop bars with an unusable close; the first alias with bars left wins
/// 3. If no alias produced bars, or all attempts together overran `budget`,
///    fall back to a synthetic random walk
pub struct DataProvider {
    source: Arc<dyn MarketDataProvider>,
    symbols: Vec<String>,
    range: String,
    timeout: Duration,
    budget: Duration,
    synthetic: SyntheticConfig,
}

impl DataProvider {
    pub fn new(source: Arc<dyn MarketDataProvider>, config: &AppConfig) -> Self {
        Self {
            source,
            symbols: config.symbols.clone(),
            range: config.history_range.clone(),
            timeout: config.market_data_timeout,
            budget: config.market_data_budget(),
            synthetic: config.synthetic.clone(),
        }
    }

    /// Always succeeds. Check `source` on the outcome to see whether the
    /// bars are real.
    pub async fn fetch(&self) -> FetchOutcome {
        let live = tokio::time::timeout(self.budget, self.fetch_live())
            .await
            .unwrap_or_else(|_| {
                Err(format!("market data budget of {}ms exhausted", self.budget.as_millis()))
            });

        match live {
            Ok((symbol, bars)) => FetchOutcome {
                bars,
                source: DataSource::Live { symbol },
            },
            Err(reason) => {
                warn!("⚠️ Using synthetic price data: {}", reason);
                FetchOutcome {
                    bars: synthetic::generate_recent_bars(&self.synthetic),
                    source: DataSource::Synthetic { reason },
                }
            }
        }
    }

    async fn fetch_live(&self) -> Result<(String, Vec<PriceBar>), String> {
        let mut last_failure = "no market symbols configured".to_string();

        for symbol in &self.symbols {
            match self.fetch_symbol(symbol).await {
                Ok(bars) if !bars.is_empty() => {
                    info!("✓ Fetched {} bars for {}", bars.len(), symbol);
                    return Ok((symbol.clone(), bars));
                }
                Ok(_) => {
                    warn!("No usable bars returned for {}, trying next symbol", symbol);
                    last_failure = format!("{}: no usable bars", symbol);
                }
                Err(e) => {
                    warn!("Market data request for {} failed: {}", symbol, e);
                    last_failure = format!("{}: {}", symbol, e);
                }
            }
        }

        Err(last_failure)
    }

    async fn fetch_symbol(&self, symbol: &str) -> Result<Vec<PriceBar>, MarketDataError> {
        let bars = tokio::time::timeout(self.timeout, self.source.fetch_daily_bars(symbol, &self.range))
            .await
            .map_err(|_| MarketDataError::Timeout(self.timeout.as_secs()))??;

        Ok(bars.into_iter().filter(PriceBar::is_valid).collect())
    }
}
