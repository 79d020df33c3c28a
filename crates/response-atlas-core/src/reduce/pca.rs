//! Variance-targeted linear reduction.
//!
//! Fits a principal component analysis on the N×D embedding matrix and keeps
//! the minimum component count whose cumulative explained-variance ratio
//! meets the configured threshold. Components are extracted one at a time by
//! power iteration with deflation, so only the components actually retained
//! are ever computed.
//!
//! When D > N the decomposition runs on the N×N Gram matrix instead of the
//! D×D covariance matrix; both share the same non-zero eigenvalues and the
//! covariance eigenvectors are recovered as `Xᵀu / ‖Xᵀu‖`.

use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::error::{ComputationError, InputError, Result};

/// Eigenvalues below this fraction of total variance are treated as rank
/// deficiency, not signal.
const EIGENVALUE_FLOOR: f64 = 1e-12;

const POWER_ITER_MAX: usize = 300;
const POWER_ITER_TOL: f64 = 1e-10;

/// Result of the linear reduction stage.
#[derive(Debug, Clone)]
pub struct PcaReduction {
    /// Projected data, N×k.
    pub projected: Array2<f64>,
    /// Explained-variance ratio per retained component, descending.
    pub explained_ratio: Vec<f64>,
}

impl PcaReduction {
    /// Number of components retained.
    pub fn components(&self) -> usize {
        self.explained_ratio.len()
    }

    /// Cumulative explained-variance ratio over retained components.
    pub fn cumulative_ratio(&self) -> f64 {
        self.explained_ratio.iter().sum()
    }
}

/// Fit PCA on `data` (rows = observations) and project onto the minimum
/// component count with cumulative explained variance >= `threshold`.
///
/// # Errors
///
/// - `InputError::DegenerateVariance` if the matrix is empty, has fewer than
///   two rows, or carries no variance at all (every row identical)
/// - `ComputationError::Reduction` if power iteration fails to converge on a
///   usable component
pub fn reduce_to_variance(data: &Array2<f64>, threshold: f64) -> Result<PcaReduction> {
    let n = data.nrows();
    let d = data.ncols();
    if n < 2 || d == 0 {
        return Err(InputError::DegenerateVariance.into());
    }

    // Mean-center columns.
    let mean = data
        .mean_axis(Axis(0))
        .ok_or(InputError::DegenerateVariance)?;
    let centered = data - &mean.insert_axis(Axis(0));

    let denom = (n - 1) as f64;
    let total_variance: f64 = centered.iter().map(|v| v * v).sum::<f64>() / denom;
    if total_variance <= 0.0 {
        return Err(InputError::DegenerateVariance.into());
    }

    // Decompose the smaller symmetric form.
    let use_gram = d > n;
    let mut work = if use_gram {
        centered.dot(&centered.t()) / denom
    } else {
        centered.t().dot(&centered) / denom
    };

    let rank_limit = d.min(n - 1);
    let mut explained_ratio: Vec<f64> = Vec::new();
    let mut scores: Vec<Array1<f64>> = Vec::new();
    let mut cumulative = 0.0;

    for component in 0..rank_limit {
        let (eigenvalue, eigenvector) = power_iteration(&work, component as u64)?;
        if eigenvalue <= total_variance * EIGENVALUE_FLOOR {
            break; // Remaining spectrum is numerical noise.
        }

        let ratio = eigenvalue / total_variance;

        // Column scores for this component.
        let score = if use_gram {
            // Gram eigenvector u: covariance eigenvector is Xᵀu normalized,
            // and the projection Xv works out to (‖Xᵀu‖⁻¹)·X Xᵀ u.
            let xtu = centered.t().dot(&eigenvector);
            let norm = xtu.dot(&xtu).sqrt();
            if norm <= 0.0 {
                break;
            }
            centered.dot(&(xtu / norm))
        } else {
            centered.dot(&eigenvector)
        };

        explained_ratio.push(ratio);
        scores.push(score);
        cumulative += ratio;

        if cumulative >= threshold {
            break;
        }

        // Deflate: A ← A − λ·vvᵀ
        let outer = outer_product(&eigenvector, &eigenvector);
        work = work - eigenvalue * outer;
    }

    if explained_ratio.is_empty() {
        return Err(InputError::DegenerateVariance.into());
    }

    let k = explained_ratio.len();
    tracing::debug!(
        components = k,
        cumulative_variance = cumulative,
        threshold,
        input_dims = d,
        "variance-targeted reduction fitted"
    );

    let mut projected = Array2::zeros((n, k));
    for (j, score) in scores.iter().enumerate() {
        projected.column_mut(j).assign(score);
    }

    Ok(PcaReduction {
        projected,
        explained_ratio,
    })
}

fn outer_product(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    let n = a.len();
    let mut out = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            out[[i, j]] = a[i] * b[j];
        }
    }
    out
}

/// Power iteration for the dominant eigenpair of a symmetric matrix.
///
/// The starting vector is drawn from a seeded RNG (varied per component) so
/// deflated matrices cannot trap the iteration in an orthogonal start, while
/// staying fully deterministic.
fn power_iteration(matrix: &Array2<f64>, component: u64) -> Result<(f64, Array1<f64>)> {
    let n = matrix.nrows();
    let mut rng = ChaCha8Rng::seed_from_u64(0x9E3779B9 ^ component);
    let mut v: Array1<f64> = Array1::from_shape_fn(n, |_| rng.gen_range(-1.0..1.0));
    let norm = v.dot(&v).sqrt();
    if norm <= 0.0 {
        return Err(ComputationError::reduction("degenerate start vector").into());
    }
    v /= norm;

    let mut eigenvalue = 0.0;
    for _ in 0..POWER_ITER_MAX {
        let av = matrix.dot(&v);
        let new_eigenvalue = v.dot(&av);
        let norm = av.dot(&av).sqrt();
        if norm <= 0.0 {
            // Matrix annihilates the vector: remaining spectrum is zero.
            return Ok((0.0, v));
        }
        let new_v = av / norm;

        let converged = (new_eigenvalue - eigenvalue).abs() <= POWER_ITER_TOL;
        v = new_v;
        eigenvalue = new_eigenvalue;
        if converged {
            break;
        }
    }

    Ok((eigenvalue, v))
}
