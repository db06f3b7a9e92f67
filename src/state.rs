use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::prediction_service::PredictionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub predictions: Arc<PredictionService>,
}
