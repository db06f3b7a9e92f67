use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::services::prediction_service::PredictionReport;
use crate::state::AppState;
use crate::utils::{format_currency, format_signed_percent};

/// Body of `GET /api/predict`, shaped for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f64,
    pub current_price: String,
    pub today_change: String,
    pub analysis: String,
    pub timestamp: String,
    pub data_source: String,
}

impl PredictResponse {
    pub fn from_report(report: &PredictionReport, currency_symbol: &str) -> Self {
        let result = &report.result;
        Self {
            prediction: result.label.as_str().to_string(),
            confidence: result.confidence,
            current_price: format_currency(result.current_price, currency_symbol),
            today_change: format_signed_percent(result.percent_change),
            analysis: result.label.analysis().to_string(),
            timestamp: result.timestamp.format("%H:%M:%S").to_string(),
            data_source: report.source.label().to_string(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_prediction))
}

/// Always 200; upstream and computation failures are absorbed below.
pub async fn get_prediction(State(state): State<AppState>) -> Json<PredictResponse> {
    info!("GET /api/predict - Computing prediction for {}", state.config.instrument_name);
    let report = state.predictions.run().await;
    Json(PredictResponse::from_report(&report, &state.config.currency_symbol))
}
