/// Router tests for the HTTP surface:
/// - GET /            dashboard page
/// - GET /api/predict prediction JSON (live and synthetic data)
/// - GET /health
/// - unknown paths    404 JSON
///
/// The market-data source is stubbed; no network access is needed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use tower::ServiceExt;

use nifty_predictor::app::{build_state, create_app};
use nifty_predictor::config::AppConfig;
use nifty_predictor::external::{MarketDataError, MarketDataProvider};
use nifty_predictor::models::PriceBar;
use nifty_predictor::routes::predict::PredictResponse;

// ---------------------------------------------------------------------------
// Stub sources
// ---------------------------------------------------------------------------

struct Closes(Vec<f64>);

#[async_trait]
impl MarketDataProvider for Closes {
    async fn fetch_daily_bars(&self, _: &str, _: &str) -> Result<Vec<PriceBar>, MarketDataError> {
        Ok(self
            .0
            .iter()
            .enumerate()
            .map(|(i, c)| PriceBar::from_close(NaiveDate::from_ymd_opt(2024, 3, 4 + i as u32).unwrap(), *c))
            .collect())
    }
}

struct Down;

#[async_trait]
impl MarketDataProvider for Down {
    async fn fetch_daily_bars(&self, _: &str, _: &str) -> Result<Vec<PriceBar>, MarketDataError> {
        Err(MarketDataError::Network("connection refused".into()))
    }
}

struct Hangs;

#[async_trait]
impl MarketDataProvider for Hangs {
    async fn fetch_daily_bars(&self, _: &str, _: &str) -> Result<Vec<PriceBar>, MarketDataError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![])
    }
}

fn app_with(source: Arc<dyn MarketDataProvider>) -> Router {
    let config = AppConfig {
        market_data_timeout: Duration::from_millis(200),
        ..AppConfig::default()
    };
    create_app(build_state(config, source))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn predict(app: Router) -> PredictResponse {
    let (status, body) = get(app, "/api/predict").await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

fn is_clock_time(s: &str) -> bool {
    let parts: Vec<&str> = s.split(':').collect();
    parts.len() == 3 && parts.iter().all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit()))
}

// ---------------------------------------------------------------------------
// /api/predict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_predict_bullish_from_live_data() {
    let body = predict(app_with(Arc::new(Closes(vec![22000.0, 22220.0])))).await;

    assert_eq!(body.prediction, "BULLISH");
    assert_eq!(body.confidence, 71.0);
    assert_eq!(body.current_price, "₹22,220.00");
    assert_eq!(body.today_change, "+1.00%");
    assert_eq!(body.analysis, "Positive momentum detected");
    assert_eq!(body.data_source, "live");
    assert!(is_clock_time(&body.timestamp), "{}", body.timestamp);
}

#[tokio::test]
async fn test_predict_bearish_from_live_data() {
    let body = predict(app_with(Arc::new(Closes(vec![100.0, 99.0])))).await;

    assert_eq!(body.prediction, "BEARISH");
    assert_eq!(body.confidence, 71.0);
    assert_eq!(body.today_change, "-1.00%");
    assert_eq!(body.analysis, "Downward pressure observed");
}

#[tokio::test]
async fn test_predict_neutral_small_move() {
    let body = predict(app_with(Arc::new(Closes(vec![100.0, 100.1])))).await;

    assert_eq!(body.prediction, "NEUTRAL");
    assert_eq!(body.confidence, 60.0);
    assert_eq!(body.today_change, "+0.10%");
}

#[tokio::test]
async fn test_predict_single_bar() {
    let body = predict(app_with(Arc::new(Closes(vec![22500.0])))).await;

    assert_eq!(body.prediction, "NEUTRAL");
    assert_eq!(body.confidence, 55.0);
    assert_eq!(body.today_change, "0.00%");
    assert_eq!(body.current_price, "₹22,500.00");
}

#[tokio::test]
async fn test_predict_survives_upstream_outage() {
    let body = predict(app_with(Arc::new(Down))).await;

    assert_eq!(body.data_source, "synthetic");
    assert!(["BULLISH", "BEARISH", "NEUTRAL"].contains(&body.prediction.as_str()));
    assert!((55.0..=90.0).contains(&body.confidence));
    assert!(body.current_price.starts_with('₹'));
    assert!(body.today_change.ends_with('%'));
}

#[tokio::test]
async fn test_predict_answers_before_request_timeout_when_upstream_hangs() {
    let config = AppConfig {
        market_data_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(300),
        ..AppConfig::default()
    };
    assert!(config.validate().is_ok());
    let app = create_app(build_state(config, Arc::new(Hangs)));

    let body = predict(app).await;

    assert_eq!(body.data_source, "synthetic");
    assert!((55.0..=90.0).contains(&body.confidence));
}

#[tokio::test]
async fn test_predict_json_keys() {
    let (_, raw) = get(app_with(Arc::new(Closes(vec![1.0, 2.0]))), "/api/predict").await;
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    for key in ["prediction", "confidence", "current_price", "today_change", "analysis", "timestamp", "data_source"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert!(value["confidence"].is_number());
}

// ---------------------------------------------------------------------------
// Other routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_page() {
    let (status, body) = get(app_with(Arc::new(Down)), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Nifty 50 Predictor</title>"));
    assert!(body.contains("/api/predict"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app_with(Arc::new(Down)), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_unknown_path_is_404_json() {
    let (status, body) = get(app_with(Arc::new(Down)), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["error"], "Not found: /api/nope");
}
