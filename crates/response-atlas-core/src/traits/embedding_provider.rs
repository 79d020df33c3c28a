//! Embedding provider trait for text-to-vector conversion.
//!
//! The pipeline treats the embedding model as an external capability with a
//! stable contract: text in, fixed-length dense vector out, deterministic for
//! identical input strings. Calls are synchronous and blocking; time-bounding
//! belongs to the caller.
//!
//! Errors propagate immediately — no fallback to fake embeddings.

use crate::error::{ComputationError, Result};

/// Trait for embedding generation.
///
/// Implementations must be `Send + Sync`; the optimizer evaluates grid
/// candidates in parallel and the provider may be shared across threads.
///
/// # Example
///
/// ```
/// use response_atlas_core::traits::EmbeddingProvider;
/// use response_atlas_core::stubs::StubEmbeddingProvider;
///
/// let provider = StubEmbeddingProvider::with_dimensions(16);
/// let vectors = provider.embed_batch(&["hello".to_string()]).unwrap();
/// assert_eq!(vectors[0].len(), 16);
/// ```
pub trait EmbeddingProvider: Send + Sync {
    /// Generate one embedding per input text, in input order.
    ///
    /// Empty strings are valid input and must produce a valid vector; a
    /// survey row with no answer still occupies its row.
    ///
    /// # Errors
    ///
    /// `ComputationError::Embedding` if generation fails for any text.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Output dimension of every vector this provider produces.
    fn dimensions(&self) -> usize;

    /// Model identifier, used for logging.
    fn model_id(&self) -> &str;
}

/// Validate that a provider returned the shape it promised.
///
/// Shared by the pipeline so every provider gets the same checks.
pub fn check_batch_shape(
    vectors: &[Vec<f32>],
    expected_rows: usize,
    expected_dim: usize,
) -> Result<()> {
    if vectors.len() != expected_rows {
        return Err(ComputationError::embedding(format!(
            "provider returned {} vectors for {} texts",
            vectors.len(),
            expected_rows
        ))
        .into());
    }
    for (i, v) in vectors.iter().enumerate() {
        if v.len() != expected_dim {
            return Err(ComputationError::embedding(format!(
                "vector {} has dimension {}, expected {}",
                i,
                v.len(),
                expected_dim
            ))
            .into());
        }
    }
    Ok(())
}
