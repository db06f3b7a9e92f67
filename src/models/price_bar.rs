use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data for the tracked instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// A bar with every price set to `close`. Handy when a source only reports closes.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
