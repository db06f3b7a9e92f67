use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Direction label derived from the latest day-over-day move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Bullish => "BULLISH",
            Signal::Bearish => "BEARISH",
            Signal::Neutral => "NEUTRAL",
        }
    }

    pub fn analysis(&self) -> &'static str {
        match self {
            Signal::Bullish => "Positive momentum detected",
            Signal::Bearish => "Downward pressure observed",
            Signal::Neutral => "Market in consolidation",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a prediction was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionBasis {
    Computed,
    /// The computation failed and fixed values were substituted.
    Fallback { reason: String },
}

/// Output of the predictor for one bar sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub signal: Signal,
    pub confidence: f64,
    pub current_price: f64,
    /// `None` when fewer than two bars were available.
    pub percent_change: Option<f64>,
    pub basis: PredictionBasis,
}

/// A prediction stamped with the time it was served. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Signal,
    pub confidence: f64,
    pub current_price: f64,
    pub percent_change: Option<f64>,
    pub basis: PredictionBasis,
    pub timestamp: DateTime<Local>,
}

impl PredictionResult {
    pub fn new(prediction: Prediction, timestamp: DateTime<Local>) -> Self {
        Self {
            label: prediction.signal,
            confidence: prediction.confidence,
            current_price: prediction.current_price,
            percent_change: prediction.percent_change,
            basis: prediction.basis,
            timestamp,
        }
    }
}
