use thiserror::Error;

use crate::models::{Prediction, PredictionBasis, PriceBar, Signal};

/// Day-over-day move (in percent) that has to be exceeded to leave NEUTRAL.
pub const MOMENTUM_THRESHOLD_PCT: f64 = 0.3;

const BASE_CONFIDENCE: f64 = 70.0;
const MAX_CONFIDENCE: f64 = 90.0;
const FLAT_CONFIDENCE: f64 = 60.0;
const SINGLE_BAR_CONFIDENCE: f64 = 55.0;

/// Values reported when the bars cannot be used at all.
pub const FALLBACK_CONFIDENCE: f64 = 55.0;
pub const FALLBACK_PRICE: f64 = 22000.0;

#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("no price bars to predict from")]
    NoBars,

    #[error("unusable close price {0}")]
    InvalidClose(f64),
}

fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn checked_close(bar: &PriceBar) -> Result<f64, PredictionError> {
    if bar.is_valid() {
        Ok(bar.close)
    } else {
        Err(PredictionError::InvalidClose(bar.close))
    }
}

/// Percent change from `previous` to `current`.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    (current - previous) / previous * 100.0
}

/// Label and confidence for a day-over-day percent change.
pub fn classify(change_pct: f64) -> (Signal, f64) {
    if change_pct > MOMENTUM_THRESHOLD_PCT {
        (Signal::Bullish, round_1dp((BASE_CONFIDENCE + change_pct).min(MAX_CONFIDENCE)))
    } else if change_pct < -MOMENTUM_THRESHOLD_PCT {
        (Signal::Bearish, round_1dp((BASE_CONFIDENCE + change_pct.abs()).min(MAX_CONFIDENCE)))
    } else {
        (Signal::Neutral, FLAT_CONFIDENCE)
    }
}

/// Momentum prediction from the last two closes.
///
/// With a single bar the label is NEUTRAL at 55. Fails when there are no
/// bars or one of the closes used is not a positive, finite number.
pub fn predict(bars: &[PriceBar]) -> Result<Prediction, PredictionError> {
    let (last, earlier) = bars.split_last().ok_or(PredictionError::NoBars)?;
    let current_price = checked_close(last)?;

    let Some(previous) = earlier.last() else {
        return Ok(Prediction {
            signal: Signal::Neutral,
            confidence: SINGLE_BAR_CONFIDENCE,
            current_price,
            percent_change: None,
            basis: PredictionBasis::Computed,
        });
    };

    let change = percent_change(checked_close(previous)?, current_price);
    let (signal, confidence) = classify(change);

    Ok(Prediction {
        signal,
        confidence,
        current_price,
        percent_change: Some(change),
        basis: PredictionBasis::Computed,
    })
}

/// Like [`predict`] but never fails: errors become NEUTRAL at 55 with the
/// fixed fallback price, tagged [`PredictionBasis::Fallback`].
pub fn predict_or_fallback(bars: &[PriceBar]) -> Prediction {
    predict(bars).unwrap_or_else(|e| Prediction {
        signal: Signal::Neutral,
        confidence: FALLBACK_CONFIDENCE,
        current_price: FALLBACK_PRICE,
        percent_change: None,
        basis: PredictionBasis::Fallback { reason: e.to_string() },
    })
}
