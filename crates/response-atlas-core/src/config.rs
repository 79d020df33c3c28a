//! Pipeline configuration.
//!
//! Defaults carry the constants the pipeline was tuned with; callers can
//! override them, but every value here has a deterministic default so two
//! runs on identical input produce identical output.

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterParams;

/// Column name the pipeline looks for when none is configured.
pub const DEFAULT_TEXT_COLUMN: &str = "responses";

/// Cumulative explained-variance target for the linear reduction stage.
pub const DEFAULT_VARIANCE_THRESHOLD: f64 = 0.80;

/// Fixed seed for the 2-D manifold projection.
///
/// Reproducible coordinates are required both for stable clustering and for
/// visualization consistency downstream.
pub const DEFAULT_MANIFOLD_SEED: u64 = 211;

/// Configuration for a pipeline run.
///
/// # Example
///
/// ```
/// use response_atlas_core::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.text_column, "responses");
/// assert_eq!(config.variance_threshold, 0.80);
/// assert_eq!(config.manifold_seed, 211);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the free-text column in the input table.
    pub text_column: String,

    /// Minimum cumulative explained-variance ratio retained by the linear
    /// reduction stage. The stage keeps the smallest component count meeting
    /// this threshold.
    pub variance_threshold: f64,

    /// Seed for the manifold projection RNG.
    pub manifold_seed: u64,

    /// Clustering configuration used when the hyperparameter search finds no
    /// multi-cluster candidate.
    pub fallback: ClusterParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            variance_threshold: DEFAULT_VARIANCE_THRESHOLD,
            manifold_seed: DEFAULT_MANIFOLD_SEED,
            fallback: ClusterParams::fallback(),
        }
    }
}
