//! Prediction service: validation, encoding and inference for one request

use crate::error::PredictError;
use crate::feature_extractor::FeatureExtractor;
use crate::models::inference::{InferenceEngine, Regressor};
use crate::types::request::PredictionRequest;
use crate::types::response::{HealthStatus, InputEcho, PredictionResult};
use anyhow::Result;
use std::sync::Arc;

/// Answers predict and health requests against an optional model.
///
/// Constructed once at startup and shared read-only across requests. A
/// service without an engine is a valid degraded state.
#[derive(Clone, Default)]
pub struct PredictionService {
    engine: Option<InferenceEngine>,
    extractor: FeatureExtractor,
}

impl PredictionService {
    pub fn new(engine: Option<InferenceEngine>) -> Self {
        Self {
            engine,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Service backed by the given model.
    pub fn with_model(model: Arc<dyn Regressor>) -> Result<Self> {
        Ok(Self::new(Some(InferenceEngine::new(model)?)))
    }

    /// Service that has no model and rejects every prediction.
    pub fn without_model() -> Self {
        Self::new(None)
    }

    pub fn model_loaded(&self) -> bool {
        self.engine.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.engine.as_ref().map(InferenceEngine::model_name)
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::healthy(self.model_loaded())
    }

    /// Predict from a raw JSON request body.
    ///
    /// Model availability is checked before the body is looked at.
    pub fn predict_json(&self, body: &[u8]) -> Result<PredictionResult, PredictError> {
        let engine = self.engine()?;
        let request = PredictionRequest::from_json_slice(body)?;
        self.run(engine, &request)
    }

    /// Predict from an already parsed request.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictError> {
        let engine = self.engine()?;
        self.run(engine, request)
    }

    fn engine(&self) -> Result<&InferenceEngine, PredictError> {
        self.engine.as_ref().ok_or(PredictError::ModelUnavailable)
    }

    fn run(
        &self,
        engine: &InferenceEngine,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictError> {
        let input = request.validate()?;
        let features = self.extractor.extract(&input);
        let raw = engine.predict(&features)?;

        Ok(PredictionResult::new(
            raw,
            InputEcho {
                rd_spend: input.rd_spend,
                administration: input.administration,
                marketing_spend: input.marketing_spend,
                state: input.state.display_name().to_string(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::models::linear::LinearModel;

    struct Failing;

    impl Regressor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _features: &[f64]) -> Result<f64> {
            anyhow::bail!("session state corrupted")
        }
    }

    fn linear_service() -> PredictionService {
        // Profit = 1000 + rd_spend + 10 * administration + 100 * marketing
        //          + 5000 if Florida, - 5000 if New York
        let model = LinearModel::new("linear", vec![1.0, 10.0, 100.0, 5000.0, -5000.0], 1000.0)
            .unwrap();
        PredictionService::with_model(Arc::new(model)).unwrap()
    }

    #[test]
    fn test_health_reflects_model_state() {
        assert!(linear_service().health().model_loaded);
        assert!(!PredictionService::without_model().health().model_loaded);
        assert_eq!(PredictionService::without_model().health().status, "healthy");
    }

    #[test]
    fn test_predict_encodes_state() {
        let service = linear_service();

        let ca = service.predict(&PredictionRequest::new(1.0, 1.0, 1.0, "california")).unwrap();
        let fl = service.predict(&PredictionRequest::new(1.0, 1.0, 1.0, "FLORIDA")).unwrap();
        let ny = service.predict(&PredictionRequest::new(1.0, 1.0, 1.0, "New York")).unwrap();
        let nv = service.predict(&PredictionRequest::new(1.0, 1.0, 1.0, "Nevada")).unwrap();

        assert_eq!(ca.prediction, 1111.0);
        assert_eq!(fl.prediction, 6111.0);
        assert_eq!(ny.prediction, -3889.0);
        assert_eq!(nv.prediction, 1111.0);

        assert_eq!(ca.input.state, "California");
        assert_eq!(fl.input.state, "Florida");
        assert_eq!(ny.input.state, "New York");
        assert_eq!(nv.input.state, "California");
        assert_eq!(ny.formatted, "$-3,889.00");
    }

    #[test]
    fn test_model_checked_before_input() {
        let service = PredictionService::without_model();

        let err = service.predict_json(b"definitely not json").unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable));

        let err = service.predict(&PredictionRequest::new(-1.0, 0.0, 0.0, "florida")).unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable));
    }

    #[test]
    fn test_invalid_input_mapped() {
        let service = linear_service();

        let err = service.predict_json(br#"{"rd_spend": -1}"#).unwrap_err();
        assert!(matches!(err, PredictError::InvalidInput(InputError::Negative { .. })));

        let err = service.predict_json(br#"{"marketing_spend": "lots"}"#).unwrap_err();
        assert!(matches!(err, PredictError::InvalidInput(InputError::NotNumeric { .. })));
    }

    #[test]
    fn test_model_failure_is_internal() {
        let service = PredictionService::with_model(Arc::new(Failing)).unwrap();
        let err = service.predict(&PredictionRequest::default()).unwrap_err();

        assert!(matches!(err, PredictError::Internal(_)));
        assert!(err.client_message().contains("session state corrupted"));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let service = linear_service();
        let request = PredictionRequest::new(165349.2, 136897.8, 471784.1, "New York");

        let first = service.predict(&request).unwrap();
        let second = service.predict(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_huge_spend_yields_finite_prediction() {
        let service = linear_service();
        let result = service.predict(&PredictionRequest::new(1e307, 0.0, 0.0, "california")).unwrap();

        assert!(result.prediction.is_finite());
        assert_eq!(result.prediction, 1e307);
        assert!(!result.formatted.contains("inf"), "{}", result.formatted);
    }
}
