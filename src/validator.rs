//! Structural chunk validation.

use crate::error::{ReorderError, Result};
use crate::types::Chunk;

/// Validate that every chunk has a non-empty id and a finite score.
///
/// Runs at pipeline step 4 (after filtering and deduplication) and fails
/// the whole call on the first invalid chunk. The index in the message
/// refers to the chunk's position in the validated list.
pub fn validate_chunks(chunks: &[Chunk]) -> Result<()> {
    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.id.is_empty() {
            return Err(ReorderError::Validation(format!(
                "Chunk at index {i} has an empty 'id'"
            )));
        }
        if !chunk.score.is_finite() {
            return Err(ReorderError::Validation(format!(
                "Chunk at index {i} has an invalid 'score' (must be a finite number)"
            )));
        }
    }
    Ok(())
}
