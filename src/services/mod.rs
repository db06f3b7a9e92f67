pub mod data_provider;
pub mod prediction_service;
pub mod predictor;
pub mod synthetic;
