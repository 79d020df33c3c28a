//! Response Atlas Core Library
//!
//! Clusters free-text survey responses into sentiment-partitioned topic
//! groups: normalize the text, embed it through an injected provider,
//! reduce the vectors to a 2-D coordinate space, search density-clustering
//! hyperparameters by silhouette score, then aggregate per-cluster
//! centroids for the all/positive/negative views.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`Response`, `Granularity`, `Partition`, `ClusteredSurvey`, etc.)
//! - Capability traits (`EmbeddingProvider`, `SentimentScorer`) with
//!   deterministic stub implementations for tests
//! - The processing stages (`normalize`, `reduce`, `cluster`, `aggregate`)
//!   and the `Pipeline` that orchestrates them
//! - Error types and a result alias
//!
//! # Example
//!
//! ```
//! use response_atlas_core::pipeline::Pipeline;
//! use response_atlas_core::stubs::{StubEmbeddingProvider, StubSentimentScorer};
//! use response_atlas_core::types::{Granularity, InputTable};
//!
//! let embedder = StubEmbeddingProvider::new();
//! let sentiment = StubSentimentScorer::new();
//! let pipeline = Pipeline::new(&embedder, &sentiment);
//!
//! let table = InputTable::from_responses(
//!     (0..20).map(|i| Some(format!("answer number {i}"))).collect(),
//! );
//! let survey = pipeline.run(&table, Granularity::Default).unwrap();
//! assert_eq!(survey.all.responses.len() + survey.noise_count, 20);
//! ```

pub mod aggregate;
pub mod cluster;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reduce;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use error::{ComputationError, InputError, PipelineError, Result};
pub use pipeline::Pipeline;
pub use types::{ClusteredSurvey, Granularity, InputTable, Partition, Response};
