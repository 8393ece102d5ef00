//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the scoring
//! model from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{PointsError, PointsResult};
use crate::models::Grade;

use super::types::{
    GradeCutoffs, GradesConfig, MetricDefinition, MetricsConfig, ModelMetadata, Policy,
    ScoringConfig,
};

/// Loads and provides access to the scoring model.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query metrics, grade cutoffs and policy.
///
/// # Directory Structure
///
/// ```text
/// config/scoring/
/// ├── model.yaml    # Model metadata and record policy
/// ├── metrics.yaml  # Metric definitions, adjustments, conditional bonuses
/// └── grades.yaml   # Grade cutoffs and points per grade
/// ```
///
/// # Example
///
/// ```no_run
/// use points_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/scoring").unwrap();
/// let metric = loader.metric("productivity").unwrap();
/// println!("{} weighs {}", metric.name, metric.weight);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Arc<ScoringConfig>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, contains invalid YAML, or
    /// describes a model that fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> PointsResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ModelMetadata>(&path.join("model.yaml"))?;
        let metrics = Self::load_yaml::<MetricsConfig>(&path.join("metrics.yaml"))?;
        let grades = Self::load_yaml::<GradesConfig>(&path.join("grades.yaml"))?;

        let config = ScoringConfig::new(metadata, metrics.metrics, grades)?;
        tracing::debug!(
            path = %path.display(),
            model = %config.model().code,
            metrics = config.metrics().len(),
            "Loaded scoring model"
        );

        Ok(Self::from_config(config))
    }

    /// Wraps an already-built scoring model.
    pub fn from_config(config: ScoringConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PointsResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PointsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PointsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying scoring model.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Returns a shared handle to the scoring model.
    pub fn shared(&self) -> Arc<ScoringConfig> {
        Arc::clone(&self.config)
    }

    /// Returns the model metadata.
    pub fn model(&self) -> &ModelMetadata {
        self.config.model()
    }

    /// Returns the record policy.
    pub fn policy(&self) -> &Policy {
        self.config.policy()
    }

    /// Gets a metric definition by its code.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use points_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/scoring")?;
    /// let metric = loader.metric("error_rate")?;
    /// println!("Target: {}", metric.target);
    /// # Ok::<(), points_engine::error::PointsError>(())
    /// ```
    pub fn metric(&self, code: &str) -> PointsResult<&MetricDefinition> {
        self.config.metric(code)
    }

    /// Returns the grade cutoffs.
    pub fn grade_cutoffs(&self) -> &GradeCutoffs {
        &self.config.grades().cutoffs
    }

    /// Returns the points credited for an overall grade.
    pub fn grade_points(&self, grade: Grade) -> Decimal {
        self.config.grades().points.for_grade(grade)
    }
}
