use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::external::market_data::{MarketDataError, MarketDataProvider};
use crate::models::PriceBar;

/// Yahoo Finance v8 chart API. No API key required.
pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl YahooChartProvider {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; NiftyPredictor/0.1)")
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
            timeout,
        }
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, MarketDataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketDataError::BadResponse(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

// Only the fields we read
#[derive(Debug, Deserialize)]
pub(crate) struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: Option<YahooMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Turn a chart payload into bars, oldest first.
///
/// Rows without a close (holidays, the still-open session) are skipped.
/// Missing open/high/low fall back to the close.
pub(crate) fn parse_chart(body: YahooChartResponse) -> Result<Vec<PriceBar>, MarketDataError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(MarketDataError::NotFound);
        }
        return Err(MarketDataError::BadResponse(error.description));
    }

    let result = body
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.swap_remove(0)) })
        .ok_or(MarketDataError::NotFound)?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::BadResponse("No quote data in response".into()))?;

    if quote.close.len() != result.timestamp.len() {
        return Err(MarketDataError::Parse(
            "Timestamp and close price arrays have different lengths".into(),
        ));
    }

    // Shift into exchange time so the bar lands on its trading date
    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let mut bars: Vec<PriceBar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let close = at(&quote.close, i)?;
            let date = chrono::DateTime::from_timestamp(ts.checked_add(offset)?, 0)?.date_naive();

            Some(PriceBar {
                date,
                open: at(&quote.open, i).unwrap_or(close),
                high: at(&quote.high, i).unwrap_or(close),
                low: at(&quote.low, i).unwrap_or(close),
                close,
                volume: at(&quote.volume, i).map(|v| v.max(0.0) as u64).unwrap_or(0),
            })
        })
        .collect();

    bars.sort_by_key(|bar| bar.date);

    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let url = self.chart_url(symbol)?;

        let resp = self
            .client
            .get(url)
            .query(&[("interval", "1d"), ("range", range)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout(self.timeout.as_secs())
                } else {
                    MarketDataError::Network(e.to_string())
                }
            })?;

        match resp.status() {
            s if s.is_success() => {}
            reqwest::StatusCode::NOT_FOUND => return Err(MarketDataError::NotFound),
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(MarketDataError::RateLimited),
            s => return Err(MarketDataError::BadResponse(format!("HTTP {}", s))),
        }

        let body: YahooChartResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout(self.timeout.as_secs())
            } else {
                MarketDataError::Parse(e.to_string())
            }
        })?;

        parse_chart(body)
    }
}
