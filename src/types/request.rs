//! Prediction request payloads and input normalization

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A spend figure as submitted by a client.
///
/// The bundled web form posts its fields as strings while API clients
/// usually send JSON numbers, so both shapes are accepted here and coerced
/// later by [`SpendValue::coerce`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SpendValue {
    Number(f64),
    Text(String),
}

impl SpendValue {
    /// Coerce to a finite number, naming `field` in the error on failure.
    pub fn coerce(&self, field: &'static str) -> Result<f64, InputError> {
        let value = match self {
            SpendValue::Number(v) => *v,
            SpendValue::Text(s) => s.trim().parse::<f64>().map_err(|_| InputError::NotNumeric {
                field,
                value: s.clone(),
            })?,
        };

        if !value.is_finite() {
            return Err(InputError::NotNumeric {
                field,
                value: value.to_string(),
            });
        }

        Ok(value)
    }
}

impl Default for SpendValue {
    fn default() -> Self {
        SpendValue::Number(0.0)
    }
}

impl From<f64> for SpendValue {
    fn from(value: f64) -> Self {
        SpendValue::Number(value)
    }
}

impl From<&str> for SpendValue {
    fn from(value: &str) -> Self {
        SpendValue::Text(value.to_string())
    }
}

/// Body of `POST /predict`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    /// Research and development spend
    #[serde(default)]
    pub rd_spend: SpendValue,

    /// Administration spend
    #[serde(default)]
    pub administration: SpendValue,

    /// Marketing spend
    #[serde(default)]
    pub marketing_spend: SpendValue,

    /// State name, matched case-insensitively
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_state() -> String {
    "california".to_string()
}

impl Default for PredictionRequest {
    fn default() -> Self {
        Self {
            rd_spend: SpendValue::default(),
            administration: SpendValue::default(),
            marketing_spend: SpendValue::default(),
            state: default_state(),
        }
    }
}

impl PredictionRequest {
    /// Create a request from numeric spends and a state name.
    pub fn new(rd_spend: f64, administration: f64, marketing_spend: f64, state: &str) -> Self {
        Self {
            rd_spend: rd_spend.into(),
            administration: administration.into(),
            marketing_spend: marketing_spend.into(),
            state: state.to_string(),
        }
    }

    /// Parse a raw JSON body. Anything that is not a JSON object with the
    /// expected field shapes is rejected.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InputError> {
        serde_json::from_slice(body).map_err(|e| InputError::MalformedBody(e.to_string()))
    }

    /// Coerce every spend to a number, then check them for negativity.
    ///
    /// All three fields are coerced before any sign check so a non-numeric
    /// field is reported even when another field is negative.
    pub fn validate(&self) -> Result<ValidatedInput, InputError> {
        let rd_spend = self.rd_spend.coerce("rd_spend")?;
        let administration = self.administration.coerce("administration")?;
        let marketing_spend = self.marketing_spend.coerce("marketing_spend")?;

        for (field, value) in [
            ("rd_spend", rd_spend),
            ("administration", administration),
            ("marketing_spend", marketing_spend),
        ] {
            if value < 0.0 {
                return Err(InputError::Negative { field, value });
            }
        }

        Ok(ValidatedInput {
            rd_spend,
            administration,
            marketing_spend,
            state: UsState::from_name(&self.state),
        })
    }
}

/// States the model was fitted on.
///
/// California is the reference level of the one-hot encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UsState {
    #[default]
    California,
    Florida,
    NewYork,
}

impl UsState {
    /// Match a state name case-insensitively. Unknown names map to California.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "florida" => UsState::Florida,
            "new york" => UsState::NewYork,
            _ => UsState::California,
        }
    }

    /// Title-cased display name
    pub fn display_name(&self) -> &'static str {
        match self {
            UsState::California => "California",
            UsState::Florida => "Florida",
            UsState::NewYork => "New York",
        }
    }

    /// `[is_florida, is_new_york]` indicator pair
    pub fn indicators(&self) -> [f64; 2] {
        match self {
            UsState::California => [0.0, 0.0],
            UsState::Florida => [1.0, 0.0],
            UsState::NewYork => [0.0, 1.0],
        }
    }
}

impl fmt::Display for UsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Request after coercion and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    pub rd_spend: f64,
    pub administration: f64,
    pub marketing_spend: f64,
    pub state: UsState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let request = PredictionRequest::from_json_slice(b"{}").unwrap();
        let input = request.validate().unwrap();

        assert_eq!(input.rd_spend, 0.0);
        assert_eq!(input.administration, 0.0);
        assert_eq!(input.marketing_spend, 0.0);
        assert_eq!(input.state, UsState::California);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let body = br#"{"rd_spend": "165349.30", "administration": " 136897.9 ", "marketing_spend": 471784, "state": "new york"}"#;
        let input = PredictionRequest::from_json_slice(body)
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(input.rd_spend, 165349.30);
        assert_eq!(input.administration, 136897.9);
        assert_eq!(input.marketing_spend, 471784.0);
        assert_eq!(input.state, UsState::NewYork);
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        let body = br#"{"rd_spend": "abc"}"#;
        let err = PredictionRequest::from_json_slice(body)
            .unwrap()
            .validate()
            .unwrap_err();

        assert!(matches!(err, InputError::NotNumeric { field: "rd_spend", .. }));
    }

    #[test]
    fn test_non_finite_string_rejected() {
        let request = PredictionRequest {
            marketing_spend: "inf".into(),
            ..Default::default()
        };

        assert!(matches!(
            request.validate(),
            Err(InputError::NotNumeric { field: "marketing_spend", .. })
        ));
    }

    #[test]
    fn test_negative_rejected_per_field() {
        let cases = [
            PredictionRequest::new(-1.0, 0.0, 0.0, "california"),
            PredictionRequest::new(10.0, -0.01, 10.0, "florida"),
            PredictionRequest::new(10.0, 10.0, -500.0, "new york"),
        ];

        for request in cases {
            assert!(matches!(request.validate(), Err(InputError::Negative { .. })));
        }
    }

    #[test]
    fn test_non_numeric_reported_before_negative() {
        let request = PredictionRequest {
            rd_spend: (-5.0).into(),
            administration: "twelve".into(),
            ..Default::default()
        };

        assert!(matches!(
            request.validate(),
            Err(InputError::NotNumeric { field: "administration", .. })
        ));
    }

    #[test]
    fn test_wrong_json_shapes_are_malformed() {
        for body in [&b"not json"[..], b"null", b"\"text\"", br#"{"rd_spend": true}"#, br#"{"state": 5}"#] {
            assert!(matches!(
                PredictionRequest::from_json_slice(body),
                Err(InputError::MalformedBody(_))
            ));
        }
    }

    #[test]
    fn test_state_matching() {
        assert_eq!(UsState::from_name("FLORIDA"), UsState::Florida);
        assert_eq!(UsState::from_name("New York"), UsState::NewYork);
        assert_eq!(UsState::from_name("california"), UsState::California);
        assert_eq!(UsState::from_name("Nevada"), UsState::California);
        assert_eq!(UsState::from_name(""), UsState::California);
    }

    #[test]
    fn test_state_indicators_are_one_hot() {
        assert_eq!(UsState::California.indicators(), [0.0, 0.0]);
        assert_eq!(UsState::Florida.indicators(), [1.0, 0.0]);
        assert_eq!(UsState::NewYork.indicators(), [0.0, 1.0]);
        assert_eq!(UsState::NewYork.to_string(), "New York");
    }
}
