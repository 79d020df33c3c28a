//! The per-row record produced by a pipeline run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label the clusterer assigns to points it could not place in any cluster.
pub const NOISE_LABEL: i32 = -1;

/// Categorical polarity derived from the scorer's numeric polarity.
///
/// Mapping: `> 0` positive, `== 0` neutral, `< 0` negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarityCategory {
    Positive,
    Neutral,
    Negative,
}

impl PolarityCategory {
    /// Categorize a numeric polarity in [-1, 1].
    pub fn from_polarity(polarity: f32) -> Self {
        if polarity > 0.0 {
            PolarityCategory::Positive
        } else if polarity < 0.0 {
            PolarityCategory::Negative
        } else {
            PolarityCategory::Neutral
        }
    }
}

/// Categorical subjectivity derived from the scorer's numeric subjectivity.
///
/// Mapping: `== 0` objective, otherwise subjective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectivityCategory {
    Objective,
    Subjective,
}

impl SubjectivityCategory {
    /// Categorize a numeric subjectivity in [0, 1].
    pub fn from_subjectivity(subjectivity: f32) -> Self {
        if subjectivity == 0.0 {
            SubjectivityCategory::Objective
        } else {
            SubjectivityCategory::Subjective
        }
    }
}

/// One survey response with all engineered features attached.
///
/// Created once per pipeline run and never mutated after aggregation.
/// `row` is the index into the original input table, so callers can join
/// demographic columns back onto filtered partitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Run-local identifier.
    pub id: Uuid,
    /// Original row index in the input table.
    pub row: usize,
    /// The text exactly as supplied (missing values become empty strings).
    pub raw_text: String,
    /// Normalized text actually handed to the embedder.
    pub cleaned_text: String,
    /// Pre-reduction embedding (dimension fixed by the embedder).
    pub embedding: Vec<f32>,
    /// 2-D manifold coordinates shared by clustering and display.
    pub coords: [f32; 2],
    /// Numeric polarity in [-1, 1], supplied by the sentiment scorer.
    pub polarity: f32,
    /// Categorical polarity.
    pub polarity_category: PolarityCategory,
    /// Numeric subjectivity in [0, 1].
    pub subjectivity: f32,
    /// Categorical subjectivity.
    pub subjectivity_category: SubjectivityCategory,
    /// Cluster label: dense non-negative integer, or [`NOISE_LABEL`].
    pub cluster_label: i32,
}

impl Response {
    /// True if the clusterer marked this response as noise.
    #[inline]
    pub fn is_noise(&self) -> bool {
        self.cluster_label == NOISE_LABEL
    }
}
