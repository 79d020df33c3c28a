//! Hyperparameter search for the density clustering stage.
//!
//! The optimizer builds a discrete (min_cluster_size, min_samples) grid
//! scaled to the row count, fits every candidate over one shared cosine
//! distance matrix, scores candidates that split the data into more than
//! one real cluster by silhouette, and commits to the winner with a final
//! refit. When nothing scores, a fixed conservative fallback is used.

use rayon::prelude::*;

use crate::cluster::distance::cosine_distance_matrix;
use crate::cluster::hdbscan::{ClusterParams, HdbscanClusterer};
use crate::cluster::silhouette::compute_silhouette_precomputed;
use crate::error::Result;
use crate::types::Granularity;

const DEFAULT_MCS_PERCENTS: [f64; 8] =
    [0.0175, 0.02, 0.0225, 0.025, 0.0275, 0.03, 0.0325, 0.035];
const DEFAULT_MCS_FLOORS: [usize; 8] = [17, 20, 22, 25, 27, 30, 32, 35];
const DEFAULT_MS_PERCENTS: [f64; 4] = [0.005, 0.0075, 0.01, 0.0125];
const DEFAULT_MS_FLOORS: [usize; 4] = [5, 6, 7, 8];

const BROAD_MCS_PERCENTS: [f64; 4] = [0.04, 0.045, 0.05, 0.055];
const BROAD_MCS_FLOORS: [usize; 4] = [50, 50, 50, 60];
const BROAD_MS_PERCENTS: [f64; 4] = [0.008, 0.009, 0.01, 0.012];
const BROAD_MS_FLOORS: [usize; 4] = [10, 10, 10, 15];

/// Percentage-of-N candidates with a hard floor. The product `n * p` is
/// truncated, not rounded, matching the historical grids downstream
/// consumers were tuned against.
fn scaled_candidates(n: usize, percents: &[f64], floors: &[usize]) -> Vec<usize> {
    percents
        .iter()
        .zip(floors)
        .map(|(&p, &floor)| floor.max((n as f64 * p) as usize))
        .collect()
}

/// All (min_cluster_size, min_samples) pairs for `n` rows, in the fixed
/// search order: min_cluster_size outer, min_samples inner.
pub fn candidate_grid(n: usize, granularity: Granularity) -> Vec<ClusterParams> {
    let (mcs, ms) = match granularity {
        Granularity::Default => (
            scaled_candidates(n, &DEFAULT_MCS_PERCENTS, &DEFAULT_MCS_FLOORS),
            scaled_candidates(n, &DEFAULT_MS_PERCENTS, &DEFAULT_MS_FLOORS),
        ),
        Granularity::Broad => (
            scaled_candidates(n, &BROAD_MCS_PERCENTS, &BROAD_MCS_FLOORS),
            scaled_candidates(n, &BROAD_MS_PERCENTS, &BROAD_MS_FLOORS),
        ),
    };
    let mut grid = Vec::with_capacity(mcs.len() * ms.len());
    for &min_cluster_size in &mcs {
        for &min_samples in &ms {
            grid.push(ClusterParams::new(min_cluster_size, min_samples));
        }
    }
    grid
}

fn count_clusters(labels: &[i32]) -> usize {
    let mut distinct: Vec<i32> = labels.iter().copied().filter(|&l| l >= 0).collect();
    distinct.sort_unstable();
    distinct.dedup();
    distinct.len()
}

pub struct ClusterOptimizer {
    granularity: Granularity,
    fallback: ClusterParams,
}

impl ClusterOptimizer {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            fallback: ClusterParams::fallback(),
        }
    }

    pub fn with_fallback(granularity: Granularity, fallback: ClusterParams) -> Self {
        Self {
            granularity,
            fallback,
        }
    }

    /// Search the grid and return (labels, winning parameters).
    pub fn optimize(&self, coords: &[[f32; 2]]) -> Result<(Vec<i32>, ClusterParams)> {
        let n = coords.len();
        let distances = cosine_distance_matrix(coords);
        let grid = candidate_grid(n, self.granularity);
        tracing::debug!(
            rows = n,
            granularity = %self.granularity,
            candidates = grid.len(),
            "starting hyperparameter search"
        );

        // Candidates are independent; evaluate them in parallel, then
        // reduce sequentially in grid order so the first-found winner is
        // stable regardless of thread scheduling.
        let scored: Vec<Option<f64>> = grid
            .par_iter()
            .map(|&params| {
                let labels = HdbscanClusterer::new(params).fit_precomputed(&distances).ok()?;
                if count_clusters(&labels) > 1 {
                    compute_silhouette_precomputed(&distances, &labels).ok()
                } else {
                    None
                }
            })
            .collect();

        let mut best: Option<(ClusterParams, f64)> = None;
        for (&params, score) in grid.iter().zip(&scored) {
            if let Some(score) = *score {
                // Strictly greater only: equal scores keep the earlier
                // candidate.
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((params, score));
                }
            }
        }

        let chosen = match best {
            Some((params, score)) => {
                tracing::info!(
                    min_cluster_size = params.min_cluster_size,
                    min_samples = params.min_samples,
                    silhouette = score,
                    "selected clustering parameters"
                );
                params
            }
            None => {
                tracing::info!(
                    min_cluster_size = self.fallback.min_cluster_size,
                    min_samples = self.fallback.min_samples,
                    "no candidate produced more than one cluster, using fallback"
                );
                self.fallback
            }
        };

        let labels = HdbscanClusterer::new(chosen).fit_precomputed(&distances)?;
        Ok((labels, chosen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NOISE_LABEL;

    #[test]
    fn test_default_grid_floor_dominated_at_small_n() {
        let grid = candidate_grid(100, Granularity::Default);
        assert_eq!(grid.len(), 32);
        let mcs: Vec<usize> = grid.iter().step_by(4).map(|p| p.min_cluster_size).collect();
        assert_eq!(mcs, vec![17, 20, 22, 25, 27, 30, 32, 35]);
        let ms: Vec<usize> = grid[..4].iter().map(|p| p.min_samples).collect();
        assert_eq!(ms, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_default_grid_at_one_thousand_rows() {
        // At N=1000 every percentage lands on or below its floor after
        // truncation, so the candidate set equals the floor set.
        let grid = candidate_grid(1000, Granularity::Default);
        let mcs: Vec<usize> = grid.iter().step_by(4).map(|p| p.min_cluster_size).collect();
        assert_eq!(mcs, vec![17, 20, 22, 25, 27, 30, 32, 35]);
        let ms: Vec<usize> = grid[..4].iter().map(|p| p.min_samples).collect();
        assert_eq!(ms, vec![5, 7, 10, 12]);
    }

    #[test]
    fn test_broad_grid_values() {
        let grid = candidate_grid(2000, Granularity::Broad);
        assert_eq!(grid.len(), 16);
        let mcs: Vec<usize> = grid.iter().step_by(4).map(|p| p.min_cluster_size).collect();
        assert_eq!(mcs, vec![80, 90, 100, 110]);
        let ms: Vec<usize> = grid[..4].iter().map(|p| p.min_samples).collect();
        assert_eq!(ms, vec![16, 18, 20, 24]);
    }

    #[test]
    fn test_percentage_truncates_not_rounds() {
        // 999 * 0.0175 = 17.4825 -> 17, and 999 * 0.035 = 34.965 -> 34,
        // which the floor of 35 then lifts back up.
        let grid = candidate_grid(999, Granularity::Default);
        assert_eq!(grid[0].min_cluster_size, 17);
        assert_eq!(grid[28].min_cluster_size, 35);
    }

    fn arc(base_deg: f32, count: usize) -> Vec<[f32; 2]> {
        (0..count)
            .map(|i| {
                let t = (base_deg + i as f32 * 0.1).to_radians();
                [t.cos(), t.sin()]
            })
            .collect()
    }

    #[test]
    fn test_two_groups_and_outliers_scenario() {
        // 22 + 23 points in two tight arcs, 5 scattered singletons.
        let mut coords = arc(0.0, 22);
        coords.extend(arc(60.0, 23));
        for angle in [150.0f32, 170.0, 190.0, 210.0, 230.0] {
            let t = angle.to_radians();
            coords.push([t.cos(), t.sin()]);
        }

        let optimizer = ClusterOptimizer::new(Granularity::Default);
        let (labels, params) = optimizer.optimize(&coords).unwrap();

        assert_eq!(labels.len(), 50);
        assert_eq!(count_clusters(&labels), 2, "labels: {labels:?}");
        let noise = labels.iter().filter(|&&l| l == NOISE_LABEL).count();
        assert_eq!(noise, 5, "labels: {labels:?}");
        let clustered = labels.iter().filter(|&&l| l >= 0).count();
        assert_eq!(clustered, 45);
        assert!(params.min_cluster_size >= 17);
    }

    #[test]
    fn test_uniform_points_trigger_fallback() {
        // One dense arc: every candidate sees at most one cluster, so the
        // search falls back to the fixed configuration.
        let coords = arc(0.0, 40);
        let optimizer = ClusterOptimizer::new(Granularity::Default);
        let (labels, params) = optimizer.optimize(&coords).unwrap();
        assert_eq!(params, ClusterParams::fallback());
        assert_eq!(labels.len(), 40);
    }

    #[test]
    fn test_optimizer_is_deterministic() {
        let mut coords = arc(0.0, 20);
        coords.extend(arc(90.0, 20));
        coords.extend(arc(200.0, 20));
        let optimizer = ClusterOptimizer::new(Granularity::Default);
        let (first, first_params) = optimizer.optimize(&coords).unwrap();
        let (second, second_params) = optimizer.optimize(&coords).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_params, second_params);
    }
}
