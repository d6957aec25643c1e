//! Model artifact loader

use crate::feature_extractor::FeatureExtractor;
use crate::models::inference::Regressor;
use crate::models::linear::LinearModel;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Artifact formats the loader understands, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// `.json` coefficient file
    Linear,
    /// `.onnx` graph run through ONNX Runtime
    Onnx,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(ModelFormat::Linear),
            Some("onnx") => Ok(ModelFormat::Onnx),
            _ => anyhow::bail!("Unsupported model format: {}", path.display()),
        }
    }
}

/// Loader for regression model artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load a model, naming it after the file stem.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<dyn Regressor>> {
        let path = path.as_ref();

        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let model: Arc<dyn Regressor> = match ModelFormat::from_path(path)? {
            ModelFormat::Linear => {
                let expected = FeatureExtractor::new().feature_names();
                Arc::new(LinearModel::from_file(path, &name, expected)?)
            }
            ModelFormat::Onnx => self.load_onnx(path, &name)?,
        };

        info!(model = %name, path = %path.display(), "Model loaded successfully");

        Ok(model)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self, path: &Path, name: &str) -> Result<Arc<dyn Regressor>> {
        let model = crate::models::onnx::OnnxModel::load(path, name, self.onnx_threads)?;
        Ok(Arc::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self, path: &Path, _name: &str) -> Result<Arc<dyn Regressor>> {
        anyhow::bail!(
            "{} is an ONNX model but the `onnx` feature is disabled (threads: {})",
            path.display(),
            self.onnx_threads
        )
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_model(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ModelFormat::from_path(Path::new("m.json")).unwrap(), ModelFormat::Linear);
        assert_eq!(ModelFormat::from_path(Path::new("m.ONNX")).unwrap(), ModelFormat::Onnx);
        assert!(ModelFormat::from_path(Path::new("finalized_model.sav")).is_err());
        assert!(ModelFormat::from_path(Path::new("model")).is_err());
    }

    #[test]
    fn test_load_linear_model() {
        let file = write_model(
            r#"{"coefficients": [1.0, 0.0, 0.0, 0.0, 0.0], "intercept": 5.0}"#,
            ".json",
        );

        let model = ModelLoader::new().load(file.path()).unwrap();
        assert_eq!(model.predict(&[10.0, 0.0, 0.0, 0.0, 0.0]).unwrap(), 15.0);
        assert_eq!(model.input_len(), Some(5));
    }

    #[test]
    fn test_missing_file_is_error() {
        let loader = ModelLoader::new();
        let err = match loader.load("does/not/exist.json") {
            Ok(model) => panic!("loaded {} from a missing file", model.name()),
            Err(err) => err,
        };
        assert!(err.to_string().contains("Model file not found"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let file = write_model("{ this is not a model", ".json");
        assert!(ModelLoader::new().load(file.path()).is_err());
    }

    #[test]
    fn test_names_checked_against_extractor() {
        let file = write_model(
            r#"{"coefficients": [1.0, 0.0, 0.0, 0.0, 0.0], "intercept": 5.0,
                "feature_names": ["State_Florida", "R&D Spend", "Administration", "Marketing Spend", "State_New York"]}"#,
            ".json",
        );
        assert!(ModelLoader::new().load(file.path()).is_err());
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn test_corrupt_onnx_file_is_error() {
        let file = write_model("not a protobuf graph", ".onnx");
        if let Ok(model) = ModelLoader::with_threads(2).load(file.path()) {
            panic!("loaded {} from a corrupt graph", model.name());
        }
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_requires_feature() {
        let file = write_model("", ".onnx");
        assert!(ModelLoader::new().load(file.path()).is_err());
    }
}
