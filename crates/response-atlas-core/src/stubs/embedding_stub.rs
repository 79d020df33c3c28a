//! Stub embedding provider for testing.
//!
//! Generates DETERMINISTIC embeddings based on content hash:
//!
//! 1. Hash the text with `DefaultHasher`
//! 2. Seed an LCG PRNG with the hash
//! 3. Generate a vector of values in [-1, 1]
//! 4. Normalize to unit length
//!
//! Same text → same embedding, different text → different embedding, and
//! the vectors are unit-norm so cosine distances behave.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::traits::EmbeddingProvider;

/// Hash-based deterministic embedding provider.
///
/// # Example
///
/// ```
/// use response_atlas_core::stubs::StubEmbeddingProvider;
/// use response_atlas_core::traits::EmbeddingProvider;
///
/// let provider = StubEmbeddingProvider::with_dimensions(8);
/// let a = provider.embed_batch(&["same text".to_string()]).unwrap();
/// let b = provider.embed_batch(&["same text".to_string()]).unwrap();
/// assert_eq!(a, b);
/// ```
pub struct StubEmbeddingProvider {
    dimensions: usize,
    model_id: String,
}

impl Default for StubEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StubEmbeddingProvider {
    /// Create with 384 dimensions (MiniLM-compatible).
    pub fn new() -> Self {
        Self::with_dimensions(384)
    }

    /// Create with custom dimensions.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_id: format!("stub-embedding-d{dimensions}"),
        }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);

        // LCG with Knuth MMIX parameters, seeded by the content hash.
        let mut seed = hasher.finish();
        let mut vector = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = (seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            vector.push(value as f32);
        }

        let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

impl EmbeddingProvider for StubEmbeddingProvider {
    /// Embedding is total: empty strings get a vector too, since an
    /// unanswered survey row still occupies its position.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.generate(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
