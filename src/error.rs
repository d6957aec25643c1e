//! Request error taxonomy and its HTTP mapping

use crate::types::response::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub const MODEL_NOT_LOADED_MESSAGE: &str = "Model not loaded. Please check server logs.";
pub const NEGATIVE_SPEND_MESSAGE: &str = "All spend values must be non-negative";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input values. Please enter valid numbers.";

/// Why a request body was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("{field} is not a valid number: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Failure of a single prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    /// No model was loaded at startup
    #[error("model not loaded")]
    ModelUnavailable,

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Anything that went wrong while building features or running the model
    #[error("inference failed: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::ModelUnavailable | PredictError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PredictError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// True when the caller must fix the request before retrying.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message returned in the `error` field of the response body
    pub fn client_message(&self) -> String {
        match self {
            PredictError::ModelUnavailable => MODEL_NOT_LOADED_MESSAGE.to_string(),
            PredictError::InvalidInput(InputError::Negative { .. }) => {
                NEGATIVE_SPEND_MESSAGE.to_string()
            }
            PredictError::InvalidInput(_) => INVALID_INPUT_MESSAGE.to_string(),
            PredictError::Internal(message) => format!("An error occurred: {}", message),
        }
    }
}

impl From<anyhow::Error> for PredictError {
    fn from(err: anyhow::Error) -> Self {
        PredictError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}
