//! Collaborator capability traits.
//!
//! # Architecture
//!
//! ```ascii
//!                  ┌──────────────────────┐
//!                  │      Reorderer       │
//!                  └──────────┬───────────┘
//!                             │ injected at configuration time
//!            ┌────────────────┴────────────────┐
//!            ▼                                 ▼
//!   ┌─────────────────┐              ┌──────────────────┐
//!   │ Reranker (async)│              │ TokenCounter     │
//!   │ rerank(chunks,  │              │ count(text)      │
//!   │   query)        │              │   -> usize       │
//!   └─────────────────┘              └──────────────────┘
//! ```
//!
//! Each capability is a narrow trait with a single operation. The
//! orchestrator never assumes a concrete implementation; anything that
//! satisfies the trait can be plugged in.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

/// External capability that refines chunk scores given a query
/// (e.g. a cross-encoder model behind an API).
///
/// Invoking the reranker is the single suspension point of a reorder
/// call. Any failure it returns is caught by the orchestrator, reported
/// to the configured handler, and the pipeline proceeds with the
/// original, unmodified scores — a reranker failure never aborts
/// reordering.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Refine chunk scores given a query. Returns chunks with updated
    /// scores; the same length is expected but not enforced.
    async fn rerank(&self, chunks: &[Chunk], query: &str) -> Result<Vec<Chunk>>;
}

/// Synchronous capability that counts tokens in a chunk's text.
///
/// Required whenever a token budget (`max_tokens`) is configured. Must
/// return a non-negative count; no timeout or suspension is involved.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}
