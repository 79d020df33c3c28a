//! Deterministic stub implementations of the consumed capabilities.
//!
//! These exist for tests and local experimentation; production callers inject
//! real providers. Both stubs are fully deterministic so pipeline runs on
//! identical input are byte-identical.

pub mod embedding_stub;
pub mod sentiment_stub;

pub use embedding_stub::StubEmbeddingProvider;
pub use sentiment_stub::StubSentimentScorer;
