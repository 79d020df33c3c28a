//! Density clustering: cosine distances, HDBSCAN, silhouette scoring, and
//! the granularity-driven hyperparameter search that ties them together.

pub mod distance;
pub mod hdbscan;
pub mod optimizer;
pub mod silhouette;

pub use distance::{cosine_distance, cosine_distance_matrix};
pub use hdbscan::{ClusterParams, HdbscanClusterer, SelectionMethod};
pub use optimizer::{candidate_grid, ClusterOptimizer};
pub use silhouette::compute_silhouette_precomputed;
