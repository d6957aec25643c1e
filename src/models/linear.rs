//! Linear regression model stored as plain coefficients

use crate::models::inference::Regressor;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk layout of a coefficient artifact.
///
/// Matches the `coef_` / `intercept_` attributes of a fitted
/// scikit-learn `LinearRegression`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelFile {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Training column names, checked against the service layout when present
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// `y = intercept + coefficients . x`
#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(name: &str, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        anyhow::ensure!(!coefficients.is_empty(), "model has no coefficients");
        anyhow::ensure!(
            coefficients.iter().all(|c| c.is_finite()) && intercept.is_finite(),
            "model parameters must be finite"
        );

        Ok(Self {
            name: name.to_string(),
            coefficients,
            intercept,
        })
    }

    /// Parse an artifact, checking its feature names against `expected_names`.
    pub fn from_json(name: &str, json: &str, expected_names: &[&str]) -> Result<Self> {
        let file: LinearModelFile =
            serde_json::from_str(json).context("Invalid linear model artifact")?;

        if let Some(names) = &file.feature_names {
            anyhow::ensure!(
                names.iter().map(String::as_str).eq(expected_names.iter().copied()),
                "feature names {:?} do not match expected {:?}",
                names,
                expected_names
            );
        }

        Self::new(name, file.coefficients, file.intercept)
    }

    /// Load an artifact from disk.
    pub fn from_file<P: AsRef<Path>>(path: P, name: &str, expected_names: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        Self::from_json(name, &json, expected_names)
    }

}

impl Regressor for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        anyhow::ensure!(
            features.len() == self.coefficients.len(),
            "expected {} features, got {}",
            self.coefficients.len(),
            features.len()
        );

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();

        Ok(self.intercept + dot)
    }
}
