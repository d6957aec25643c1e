//! Type definitions for the prediction service

pub mod request;
pub mod response;

pub use request::{PredictionRequest, SpendValue, UsState, ValidatedInput};
pub use response::{ErrorResponse, HealthStatus, InputEcho, PredictionResponse, PredictionResult};
