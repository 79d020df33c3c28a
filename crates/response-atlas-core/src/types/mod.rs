//! Domain types for the response clustering pipeline.
//!
//! # Key Types
//!
//! - [`Response`]: one survey answer with its engineered features
//! - [`PolarityCategory`] / [`SubjectivityCategory`]: categorical sentiment
//! - [`Partition`]: the three sentiment-based views (All, Positive, Negative)
//! - [`Centroid`]: per-(partition, cluster) aggregate
//! - [`InputTable`] / [`Column`]: minimal column-oriented input
//! - [`Granularity`]: hyperparameter-grid profile selector
//! - [`ClusteredSurvey`] / [`PartitionTable`]: the pipeline output bundle

pub mod granularity;
pub mod output;
pub mod partition;
pub mod response;
pub mod table;

pub use granularity::Granularity;
pub use output::{ClusteredSurvey, PartitionTable};
pub use partition::{Centroid, Partition};
pub use response::{PolarityCategory, Response, SubjectivityCategory, NOISE_LABEL};
pub use table::{Column, InputTable};
