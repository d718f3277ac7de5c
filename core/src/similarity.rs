use crate::error::{ClusterError, Result};
use crate::vocabulary::DocumentVector;

/// Cosine similarity of two vectors built over the same vocabulary.
///
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// Returns `0.0` when either vector is all zeros. Vectors whose key sets
/// differ are rejected with [`ClusterError::DimensionMismatch`].
pub fn cosine_similarity(a: &DocumentVector, b: &DocumentVector) -> Result<f64> {
    if a.len() != b.len() {
        return Err(ClusterError::DimensionMismatch { expected: a.len(), found: b.len() });
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (term, x) in a.iter() {
        let y = b
            .get(term)
            .ok_or(ClusterError::DimensionMismatch { expected: a.len(), found: b.len() })?;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    // sqrt of the product keeps self-similarity exact for presence vectors
    let denom = (norm_a * norm_b).sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / denom).clamp(0.0, 1.0))
}
