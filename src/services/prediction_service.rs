use chrono::Local;
use tracing::{info, warn};

use crate::models::{PredictionBasis, PredictionResult};
use crate::services::data_provider::{DataProvider, DataSource};
use crate::services::predictor;

/// Everything the API needs to answer one prediction request.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub result: PredictionResult,
    pub source: DataSource,
    pub bar_count: usize,
}

/// Fetch, then predict. Holds no per-request state.
pub struct PredictionService {
    data_provider: DataProvider,
}

impl PredictionService {
    pub fn new(data_provider: DataProvider) -> Self {
        Self { data_provider }
    }

    pub async fn run(&self) -> PredictionReport {
        let outcome = self.data_provider.fetch().await;
        let prediction = predictor::predict_or_fallback(&outcome.bars);

        if let PredictionBasis::Fallback { reason } = &prediction.basis {
            warn!("⚠️ Prediction fell back to fixed values: {}", reason);
        }

        info!(
            "Prediction {} ({:.1}%) at {:.2} from {} {} bars",
            prediction.signal,
            prediction.confidence,
            prediction.current_price,
            outcome.bars.len(),
            outcome.source.label(),
        );

        PredictionReport {
            result: PredictionResult::new(prediction, Local::now()),
            bar_count: outcome.bars.len(),
            source: outcome.source,
        }
    }
}
