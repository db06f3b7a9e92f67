use std::sync::Arc;

use axum::http::Uri;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::MarketDataProvider;
use crate::routes::{dashboard, health, predict};
use crate::services::data_provider::DataProvider;
use crate::services::prediction_service::PredictionService;
use crate::state::AppState;

pub fn build_state(config: AppConfig, source: Arc<dyn MarketDataProvider>) -> AppState {
    let data_provider = DataProvider::new(source, &config);
    AppState {
        config: Arc::new(config),
        predictions: Arc::new(PredictionService::new(data_provider)),
    }
}

pub fn create_app(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout;

    Router::<AppState>::new()
        .merge(dashboard::router())
        .nest("/health", health::router())
        .nest("/api/predict", predict::router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
