//! Two-stage dimensionality reduction.
//!
//! Raw embeddings are too high-dimensional for density clustering to behave
//! predictably. Stage one ([`pca`]) is a variance-targeted linear projection
//! that bounds information loss; stage two ([`manifold`]) produces the 2-D
//! coordinate space shared by clustering and display, so the two agree
//! spatially by construction.

pub mod manifold;
pub mod pca;

use ndarray::Array2;

use crate::error::{ComputationError, InputError, Result};

pub use pca::PcaReduction;

/// Orchestrates the linear and manifold reduction stages.
///
/// Deterministic given a fixed seed: repeated runs on identical input
/// produce identical coordinates.
#[derive(Debug, Clone)]
pub struct DimensionalityReducer {
    variance_threshold: f64,
    seed: u64,
}

impl DimensionalityReducer {
    /// Create a reducer with the given cumulative-variance target and
    /// manifold seed.
    pub fn new(variance_threshold: f64, seed: u64) -> Self {
        Self {
            variance_threshold,
            seed,
        }
    }

    /// Reduce N embedding vectors of fixed dimension D to N (x, y) pairs.
    ///
    /// # Errors
    ///
    /// - `InputError::DegenerateVariance` for empty or variance-free input
    /// - `ComputationError::Reduction` if the manifold stage cannot run
    pub fn reduce(&self, embeddings: &[Vec<f32>]) -> Result<Vec<[f32; 2]>> {
        let n = embeddings.len();
        let d = embeddings.first().map(|e| e.len()).unwrap_or(0);
        if n == 0 || d == 0 {
            return Err(InputError::DegenerateVariance.into());
        }
        if let Some((i, row)) = embeddings.iter().enumerate().find(|(_, e)| e.len() != d) {
            return Err(ComputationError::reduction(format!(
                "embedding {} has dimension {}, expected {}",
                i,
                row.len(),
                d
            ))
            .into());
        }

        let mut matrix = Array2::zeros((n, d));
        for (i, embedding) in embeddings.iter().enumerate() {
            for (j, &v) in embedding.iter().enumerate() {
                matrix[[i, j]] = v as f64;
            }
        }

        let reduction = pca::reduce_to_variance(&matrix, self.variance_threshold)?;
        tracing::debug!(
            rows = n,
            input_dims = d,
            components = reduction.components(),
            "linear reduction complete"
        );

        manifold::project_2d(&reduction.projected, self.seed)
    }
}
