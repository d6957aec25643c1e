//! Profit Prediction Service Library
//!
//! Serves a pre-fitted multivariate linear regression that predicts startup
//! profit from R&D, administration and marketing spend plus the state the
//! company operates in.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod server;
pub mod service;
pub mod types;

pub use config::AppConfig;
pub use error::{InputError, PredictError};
pub use feature_extractor::FeatureExtractor;
pub use models::inference::{InferenceEngine, Regressor};
pub use server::{router, AppState};
pub use service::PredictionService;
pub use types::{request::PredictionRequest, response::PredictionResult};
