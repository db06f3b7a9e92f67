mod price_bar;
mod prediction;

pub use price_bar::PriceBar;
pub use prediction::{Prediction, PredictionBasis, PredictionResult, Signal};
