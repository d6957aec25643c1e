//! Response payloads for the HTTP surface

use serde::{Deserialize, Serialize};

/// Normalized inputs echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEcho {
    pub rd_spend: f64,
    pub administration: f64,
    pub marketing_spend: f64,
    /// Title-cased state the prediction was encoded with
    pub state: String,
}

/// Result of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted profit rounded to cents
    pub prediction: f64,
    /// Prediction rendered as US currency, e.g. `$192,261.83`
    pub formatted: String,
    pub input: InputEcho,
}

impl PredictionResult {
    /// Build a result from the raw model output.
    pub fn new(raw_prediction: f64, input: InputEcho) -> Self {
        let prediction = round_cents(raw_prediction);
        Self {
            prediction,
            formatted: format_usd(prediction),
            input,
        }
    }
}

/// Body of a successful `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: PredictionResult,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
}

impl HealthStatus {
    pub fn healthy(model_loaded: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded,
        }
    }
}

/// Round to two decimal places, ties to even on the exact binary value.
///
/// Goes through the decimal rendering so that very large values never pass
/// through an overflowing `value * 100.0`.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Format as dollars with thousands separators and exactly two decimals.
///
/// Negative amounts keep the sign after the currency symbol: `$-1,234.50`.
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}
