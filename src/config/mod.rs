//! Configuration loading and management for the scoring model.
//!
//! This module loads the scoring model from YAML files: model metadata and
//! record policy, metric definitions, and grade cutoffs.
//!
//! # Example
//!
//! ```no_run
//! use points_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/scoring").unwrap();
//! println!("Loaded model: {}", config.model().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    Adjustment, AdjustmentKind, Aggregation, ConditionalBonus, GradeCutoffs, GradePoints,
    GradesConfig, MetricDefinition, MetricsConfig, ModelMetadata, Policy, Polarity,
    ScoringConfig,
};

#[cfg(test)]
pub(crate) use types::test_support;
