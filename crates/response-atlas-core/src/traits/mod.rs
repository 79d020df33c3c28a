//! Capability traits consumed by the pipeline.
//!
//! The pipeline does not implement embedding or sentiment scoring; both are
//! injected by the caller. Deterministic stub implementations for tests live
//! in [`crate::stubs`].

pub mod embedding_provider;
pub mod sentiment_scorer;

pub use embedding_provider::{check_batch_shape, EmbeddingProvider};
pub use sentiment_scorer::{SentimentScore, SentimentScorer};
