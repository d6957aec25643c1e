//! Feature extraction for profit model inference.
//!
//! Builds the model input row in the column order used when the regression
//! was fitted: three spend figures followed by the state indicators.

use crate::types::request::ValidatedInput;

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 5;

/// Column names of the fitted model, in input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "R&D Spend",
    "Administration",
    "Marketing Spend",
    "State_Florida",
    "State_New York",
];

/// Turns validated request input into a model feature vector.
///
/// California is the reference level, so it has no indicator column.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract `[rd_spend, administration, marketing_spend, is_florida, is_new_york]`.
    pub fn extract(&self, input: &ValidatedInput) -> [f64; FEATURE_COUNT] {
        let [is_florida, is_new_york] = input.state.indicators();

        [
            input.rd_spend,
            input.administration,
            input.marketing_spend,
            is_florida,
            is_new_york,
        ]
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::UsState;

    fn input(state: UsState) -> ValidatedInput {
        ValidatedInput {
            rd_spend: 165349.2,
            administration: 136897.8,
            marketing_spend: 471784.1,
            state,
        }
    }

    #[test]
    fn test_feature_order() {
        let features = FeatureExtractor::new().extract(&input(UsState::NewYork));
        assert_eq!(features, [165349.2, 136897.8, 471784.1, 0.0, 1.0]);
    }

    #[test]
    fn test_california_is_reference_level() {
        let extractor = FeatureExtractor::new();

        assert_eq!(extractor.extract(&input(UsState::California))[3..], [0.0, 0.0]);
        assert_eq!(extractor.extract(&input(UsState::Florida))[3..], [1.0, 0.0]);
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 5);
        assert_eq!(extractor.feature_names().len(), 5);
    }
}
