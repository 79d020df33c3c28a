//! Seeded 2-D manifold projection.
//!
//! A compact neighbor-embedding in the UMAP family: build a fuzzy k-nearest
//! neighbor graph over the variance-reduced representation, initialize the
//! layout from the first two principal components, then run attraction /
//! repulsion SGD with a seeded RNG. Identical input and seed produce
//! identical coordinates — reproducibility is required both for stable
//! clustering and for visualization consistency downstream.

use ndarray::Array2;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::error::{ComputationError, Result};

/// Neighborhood size cap; clamped to N-1 for small inputs.
const N_NEIGHBORS: usize = 15;

/// SGD epochs. Inputs here are at most a few thousand rows, so the
/// small-dataset epoch count is always appropriate.
const N_EPOCHS: usize = 300;

/// Negative samples drawn per positive edge per epoch.
const NEGATIVE_SAMPLE_RATE: usize = 5;

/// Curve parameters for min_dist = 0.1 (the common default fit).
const CURVE_A: f64 = 1.577;
const CURVE_B: f64 = 0.8951;

/// Repulsion strength.
const REPULSION_GAMMA: f64 = 1.0;

/// Per-component gradient clip.
const GRAD_CLIP: f64 = 4.0;

/// Initial learning rate, decayed linearly to zero.
const INITIAL_ALPHA: f64 = 1.0;

/// Project the N×k reduced matrix down to N 2-D points.
///
/// # Errors
///
/// `ComputationError::Reduction` if there are fewer than 3 rows — the
/// neighbor graph needs at least two neighbors per point.
pub fn project_2d(data: &Array2<f64>, seed: u64) -> Result<Vec<[f32; 2]>> {
    let n = data.nrows();
    if n < 3 {
        return Err(ComputationError::reduction(format!(
            "manifold projection needs at least 3 rows, got {n}"
        ))
        .into());
    }

    let k = N_NEIGHBORS.min(n - 1);
    let edges = fuzzy_neighbor_graph(data, k);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut layout = initial_layout(data, &mut rng);

    // Attraction along graph edges, repulsion against sampled non-neighbors.
    for epoch in 0..N_EPOCHS {
        let alpha = INITIAL_ALPHA * (1.0 - epoch as f64 / N_EPOCHS as f64);

        for &(i, j, weight) in &edges {
            let d2 = sq_dist(&layout[i], &layout[j]);
            let attract = attraction_coeff(d2) * weight;
            for c in 0..2 {
                let grad = clip(attract * (layout[i][c] - layout[j][c]));
                layout[i][c] += alpha * grad;
                layout[j][c] -= alpha * grad;
            }

            for _ in 0..NEGATIVE_SAMPLE_RATE {
                let other = rng.gen_range(0..n);
                if other == i {
                    continue;
                }
                let d2 = sq_dist(&layout[i], &layout[other]);
                let repel = repulsion_coeff(d2);
                for c in 0..2 {
                    let grad = clip(repel * (layout[i][c] - layout[other][c]));
                    layout[i][c] += alpha * grad;
                }
            }
        }
    }

    tracing::debug!(
        rows = n,
        neighbors = k,
        epochs = N_EPOCHS,
        seed,
        "manifold projection complete"
    );

    Ok(layout
        .into_iter()
        .map(|p| [p[0] as f32, p[1] as f32])
        .collect())
}

/// Gradient coefficient pulling edge endpoints together.
fn attraction_coeff(d2: f64) -> f64 {
    if d2 <= 0.0 {
        return 0.0;
    }
    let denom = 1.0 + CURVE_A * d2.powf(CURVE_B);
    -2.0 * CURVE_A * CURVE_B * d2.powf(CURVE_B - 1.0) / denom
}

/// Gradient coefficient pushing sampled pairs apart.
fn repulsion_coeff(d2: f64) -> f64 {
    let denom = (0.001 + d2) * (1.0 + CURVE_A * d2.powf(CURVE_B));
    2.0 * REPULSION_GAMMA * CURVE_B / denom
}

fn clip(v: f64) -> f64 {
    v.clamp(-GRAD_CLIP, GRAD_CLIP)
}

fn sq_dist(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Layout initialization: first two reduced components scaled into a ±10
/// box, plus a whisper of seeded jitter to break exact ties.
fn initial_layout(data: &Array2<f64>, rng: &mut ChaCha8Rng) -> Vec<[f64; 2]> {
    let n = data.nrows();
    let cols = data.ncols();

    let mut layout = vec![[0.0f64; 2]; n];
    let mut max_abs = 0.0f64;
    for i in 0..n {
        layout[i][0] = data[[i, 0]];
        layout[i][1] = if cols > 1 { data[[i, 1]] } else { 0.0 };
        max_abs = max_abs.max(layout[i][0].abs()).max(layout[i][1].abs());
    }

    let scale = if max_abs > 0.0 { 10.0 / max_abs } else { 1.0 };
    for p in &mut layout {
        p[0] = p[0] * scale + rng.gen_range(-1e-4..1e-4);
        p[1] = p[1] * scale + rng.gen_range(-1e-4..1e-4);
    }
    layout
}

/// Build the symmetrized fuzzy kNN graph as a deterministic edge list.
///
/// Per-point weights use the smooth-kNN calibration: distances are shifted
/// by the nearest-neighbor distance rho and scaled by a sigma found by
/// binary search so the effective neighborhood size is log2(k).
fn fuzzy_neighbor_graph(data: &Array2<f64>, k: usize) -> Vec<(usize, usize, f64)> {
    let n = data.nrows();

    // kNN lists by Euclidean distance in the reduced space.
    let mut neighbor_lists: Vec<Vec<(usize, f64)>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut dists: Vec<(usize, f64)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, row_dist(data, i, j)))
            .collect();
        dists.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        dists.truncate(k);
        neighbor_lists.push(dists);
    }

    // Directed fuzzy weights.
    let target = (k as f64).log2();
    let mut directed: std::collections::HashMap<(usize, usize), f64> =
        std::collections::HashMap::new();
    for (i, neighbors) in neighbor_lists.iter().enumerate() {
        let rho = neighbors.first().map(|&(_, d)| d).unwrap_or(0.0);
        let sigma = calibrate_sigma(neighbors, rho, target);
        for &(j, d) in neighbors {
            let w = (-((d - rho).max(0.0)) / sigma).exp();
            directed.insert((i, j), w);
        }
    }

    // Symmetrize: w = w_ij + w_ji - w_ij * w_ji, each undirected pair once.
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    for (&(i, j), &w_ij) in &directed {
        if i > j {
            continue;
        }
        let w_ji = directed.get(&(j, i)).copied().unwrap_or(0.0);
        let w = w_ij + w_ji - w_ij * w_ji;
        if w > 0.0 {
            edges.push((i, j, w));
        }
    }
    for (&(i, j), &w_ji) in &directed {
        if i <= j || directed.contains_key(&(j, i)) {
            continue;
        }
        let w = w_ji; // one-directional edge
        edges.push((j, i, w));
    }

    // HashMap iteration order is not deterministic; the SGD schedule is.
    edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    edges
}

/// Binary search for the smooth-kNN bandwidth.
fn calibrate_sigma(neighbors: &[(usize, f64)], rho: f64, target: f64) -> f64 {
    let mut lo = 1e-8;
    let mut hi = 1e4;
    let mut sigma = 1.0;
    for _ in 0..64 {
        let sum: f64 = neighbors
            .iter()
            .map(|&(_, d)| (-((d - rho).max(0.0)) / sigma).exp())
            .sum();
        if (sum - target).abs() < 1e-5 {
            break;
        }
        if sum > target {
            hi = sigma;
        } else {
            lo = sigma;
        }
        sigma = (lo + hi) / 2.0;
    }
    sigma.max(1e-8)
}

fn row_dist(data: &Array2<f64>, i: usize, j: usize) -> f64 {
    let mut sum = 0.0;
    for c in 0..data.ncols() {
        let diff = data[[i, c]] - data[[j, c]];
        sum += diff * diff;
    }
    sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn two_blobs(n_per: usize) -> Array2<f64> {
        // Two tight groups far apart on the first axis.
        let mut rows = Vec::new();
        for i in 0..n_per {
            let jitter = (i as f64 % 5.0) * 0.01;
            rows.push([-50.0 + jitter, jitter]);
        }
        for i in 0..n_per {
            let jitter = (i as f64 % 5.0) * 0.01;
            rows.push([50.0 - jitter, -jitter]);
        }
        let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Array2::from_shape_vec((n_per * 2, 2), flat).unwrap()
    }

    #[test]
    fn test_output_shape_and_determinism() {
        let data = two_blobs(10);
        let a = project_2d(&data, 211).unwrap();
        let b = project_2d(&data, 211).unwrap();
        assert_eq!(a.len(), 20);
        assert_eq!(a, b, "same input and seed must give identical coordinates");
    }

    #[test]
    fn test_different_seed_different_layout() {
        let data = two_blobs(10);
        let a = project_2d(&data, 211).unwrap();
        let b = project_2d(&data, 212).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_separated_groups_stay_separated() {
        let n_per = 12;
        let data = two_blobs(n_per);
        let coords = project_2d(&data, 211).unwrap();

        // Max within-group spread must stay below the between-group gap.
        let centroid = |range: std::ops::Range<usize>| -> [f32; 2] {
            let mut c = [0.0f32; 2];
            for i in range.clone() {
                c[0] += coords[i][0];
                c[1] += coords[i][1];
            }
            [c[0] / range.len() as f32, c[1] / range.len() as f32]
        };
        let ca = centroid(0..n_per);
        let cb = centroid(n_per..2 * n_per);
        let gap = ((ca[0] - cb[0]).powi(2) + (ca[1] - cb[1]).powi(2)).sqrt();

        let spread = |range: std::ops::Range<usize>, c: [f32; 2]| -> f32 {
            range
                .map(|i| ((coords[i][0] - c[0]).powi(2) + (coords[i][1] - c[1]).powi(2)).sqrt())
                .fold(0.0f32, f32::max)
        };
        let max_spread = spread(0..n_per, ca).max(spread(n_per..2 * n_per, cb));

        assert!(
            gap > max_spread * 2.0,
            "groups must remain separated: gap={gap} max_spread={max_spread}"
        );
    }

    #[test]
    fn test_too_few_rows_is_a_computation_error() {
        let data = Array2::from_shape_vec((2, 2), vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        let err = project_2d(&data, 211).unwrap_err();
        assert!(err.to_string().contains("at least 3 rows"));
    }
}
