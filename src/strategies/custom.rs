//! Custom strategy: caller-supplied comparator.

use crate::types::{CustomComparator, ScoredChunk};

/// Sort chunks with a user-provided comparison function. The comparator
/// sees the public [`Chunk`](crate::types::Chunk), never the internal
/// scored wrapper.
pub fn custom_sort(mut chunks: Vec<ScoredChunk>, comparator: &CustomComparator) -> Vec<ScoredChunk> {
    chunks.sort_by(|a, b| comparator(&a.chunk, &b.chunk));
    chunks
}
