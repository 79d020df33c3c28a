//! Error types for response-atlas-core.
//!
//! Two failure domains exist in the pipeline:
//!
//! - [`InputError`]: the caller handed us something unusable (missing text
//!   column, empty table, unknown granularity, degenerate variance). Surfaced
//!   immediately, never retried internally.
//! - [`ComputationError`]: a numeric stage failed mid-flight (reduction,
//!   clustering, embedding). Surfaced with the underlying cause, not retried.
//!
//! An exhausted hyperparameter search is NOT an error: the optimizer falls
//! back to a fixed default configuration silently (see `cluster::optimizer`).
//!
//! Library code never panics; everything propagates through [`Result`].

use thiserror::Error;

// ============================================================================
// INPUT ERROR
// ============================================================================

/// Errors caused by invalid caller input.
///
/// These are presented to the user for correction and re-submission; the
/// pipeline performs no partial recovery.
#[derive(Debug, Error)]
pub enum InputError {
    /// The designated text column is absent from the input table.
    #[error("Input table must contain the '{column}' column")]
    MissingColumn {
        /// Name of the column that was expected
        column: String,
    },

    /// The input table has no rows.
    #[error("The input table is empty. Clustering cannot be performed.")]
    EmptyTable,

    /// Granularity value outside the supported set.
    #[error("Granularity must be 'default' or 'broad', got '{value}'")]
    UnsupportedGranularity {
        /// The rejected value
        value: String,
    },

    /// Variance-targeted reduction selected zero components.
    ///
    /// # When This Occurs
    ///
    /// - All embedding vectors are identical (zero total variance)
    /// - The embedding matrix is empty
    #[error("Variance reduction is degenerate: input has no usable variance")]
    DegenerateVariance,
}

// ============================================================================
// COMPUTATION ERROR
// ============================================================================

/// Errors raised by the numeric stages.
#[derive(Debug, Error)]
pub enum ComputationError {
    /// Embedding generation failed.
    #[error("Embedding generation failed: {reason}")]
    Embedding {
        /// Detailed reason from the provider
        reason: String,
    },

    /// Dimensionality reduction failed.
    ///
    /// Typically too few rows for the requested manifold dimensionality.
    #[error("Dimensionality reduction failed: {reason}")]
    Reduction {
        /// Detailed reason for failure
        reason: String,
    },

    /// Density clustering failed.
    #[error("Clustering failed: {reason}")]
    Clustering {
        /// Detailed reason for failure
        reason: String,
    },
}

impl ComputationError {
    /// Shorthand for an embedding failure.
    pub fn embedding(reason: impl Into<String>) -> Self {
        Self::Embedding {
            reason: reason.into(),
        }
    }

    /// Shorthand for a reduction failure.
    pub fn reduction(reason: impl Into<String>) -> Self {
        Self::Reduction {
            reason: reason.into(),
        }
    }

    /// Shorthand for a clustering failure.
    pub fn clustering(reason: impl Into<String>) -> Self {
        Self::Clustering {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// UNIFIED PIPELINE ERROR
// ============================================================================

/// Top-level error type for the response clustering pipeline.
///
/// All stage errors convert into this type via `From`, so pipeline code can
/// propagate with `?` throughout.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid input supplied by the caller.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// A numeric stage failed.
    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),
}

impl PipelineError {
    /// True if re-submitting corrected input could succeed.
    ///
    /// Input errors are always caller-correctable; computation errors may
    /// indicate data that is fundamentally unsuitable.
    pub fn is_input(&self) -> bool {
        matches!(self, PipelineError::Input(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
