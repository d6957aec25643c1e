//! Regression model backends and inference

pub mod inference;
pub mod linear;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use inference::{InferenceEngine, Regressor};
pub use linear::LinearModel;
pub use loader::ModelLoader;
