//! Mean silhouette coefficient over a precomputed distance matrix.
//!
//! Labels are taken exactly as given: noise (-1) participates as one more
//! group rather than being filtered out, which penalizes parameterizations
//! that shed large amounts of scattered noise. Scoring requires at least
//! two distinct groups overall; members of singleton groups contribute 0.

use crate::error::{ComputationError, Result};

pub fn compute_silhouette_precomputed(distances: &[Vec<f32>], labels: &[i32]) -> Result<f64> {
    let n = distances.len();
    if labels.len() != n {
        return Err(ComputationError::clustering(format!(
            "label count {} does not match matrix size {}",
            labels.len(),
            n
        ))
        .into());
    }
    if n < 2 {
        return Err(
            ComputationError::clustering("silhouette requires at least 2 points").into(),
        );
    }

    let mut groups: Vec<i32> = labels.to_vec();
    groups.sort_unstable();
    groups.dedup();
    if groups.len() < 2 {
        return Err(ComputationError::clustering(
            "silhouette requires at least 2 distinct groups",
        )
        .into());
    }

    let group_index = |label: i32| groups.binary_search(&label).unwrap_or(0);
    let mut group_sizes = vec![0usize; groups.len()];
    for &label in labels {
        group_sizes[group_index(label)] += 1;
    }

    let mut total = 0.0f64;
    for i in 0..n {
        let own = group_index(labels[i]);
        if group_sizes[own] <= 1 {
            continue; // singleton contributes 0
        }

        // Mean distance from i to every group, own group excluding i.
        let mut sums = vec![0.0f64; groups.len()];
        for j in 0..n {
            if j != i {
                sums[group_index(labels[j])] += distances[i][j] as f64;
            }
        }
        let a = sums[own] / (group_sizes[own] - 1) as f64;
        let b = (0..groups.len())
            .filter(|&g| g != own && group_sizes[g] > 0)
            .map(|g| sums[g] / group_sizes[g] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    Ok(total / n as f64)
}
