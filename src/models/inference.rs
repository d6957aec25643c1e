//! Inference engine wrapping a loaded regression model

use crate::config::AppConfig;
use crate::feature_extractor::FEATURE_COUNT;
use crate::models::loader::ModelLoader;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A fitted regression model producing one value per feature row.
///
/// Implementations must be safe to call from many requests at once.
pub trait Regressor: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Number of input features, when the artifact records it.
    fn input_len(&self) -> Option<usize> {
        None
    }

    /// Predict a single row.
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// Runs predictions against a single model and checks its contract.
#[derive(Clone)]
pub struct InferenceEngine {
    model: Arc<dyn Regressor>,
}

impl InferenceEngine {
    /// Wrap a model, rejecting one that expects a different feature layout.
    pub fn new(model: Arc<dyn Regressor>) -> Result<Self> {
        if let Some(len) = model.input_len() {
            anyhow::ensure!(
                len == FEATURE_COUNT,
                "model {} expects {} features, service provides {}",
                model.name(),
                len,
                FEATURE_COUNT
            );
        }

        Ok(Self { model })
    }

    /// Load the model named in the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads);
        let model = loader.load(&config.model.path)?;
        let engine = Self::new(model)?;

        info!(
            model = %engine.model_name(),
            path = %config.model.path,
            "Inference engine initialized"
        );

        Ok(engine)
    }

    /// Load the configured model, or return `None` and log why.
    ///
    /// The service keeps running without a model and reports it through
    /// the health endpoint.
    pub fn try_from_config(config: &AppConfig) -> Option<Self> {
        match Self::from_config(config) {
            Ok(engine) => Some(engine),
            Err(e) => {
                tracing::error!(
                    path = %config.model.path,
                    error = format!("{:#}", e),
                    "Model could not be loaded, serving in degraded mode"
                );
                None
            }
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Predict one feature row.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        anyhow::ensure!(
            features.len() == FEATURE_COUNT,
            "expected {} features, got {}",
            FEATURE_COUNT,
            features.len()
        );

        let start = Instant::now();
        let prediction = self
            .model
            .predict(features)
            .with_context(|| format!("model {} failed", self.model.name()))?;

        anyhow::ensure!(
            prediction.is_finite(),
            "model {} produced a non-finite prediction",
            self.model.name()
        );

        debug!(
            model = %self.model.name(),
            prediction = prediction,
            inference_us = start.elapsed().as_micros() as u64,
            "Inference complete"
        );

        Ok(prediction)
    }
}
