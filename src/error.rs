//! Error types for reordering operations.
//!
//! # Error Handling Philosophy
//!
//! Two error kinds exist, with very different lifecycles:
//!
//! | Error | Lifecycle |
//! |-------|-----------|
//! | `Validation` | Fatal to the current call. Surfaced immediately, never retried. |
//! | `Reranker` | Recovered by the orchestrator: reported to the configured handler, then the pipeline continues with original scores. |
//!
//! Malformed input is rejected up front rather than coerced; there is no
//! other recoverable-error category.

use thiserror::Error;

/// Result type for reordering operations.
pub type Result<T> = std::result::Result<T, ReorderError>;

/// Errors that can occur while configuring or running the reorder pipeline.
#[derive(Debug, Error)]
pub enum ReorderError {
    /// Configuration is malformed or a chunk failed structural validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON (de)serialization failure at the chunk boundary.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reported by an external reranker.
    ///
    /// The orchestrator never propagates this as a call failure; it is
    /// forwarded to the configured `on_reranker_error` handler and the
    /// pipeline falls back to the original scores.
    #[error("Reranker error: {0}")]
    Reranker(String),
}
