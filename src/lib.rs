//! Context Reorder - Chunk Reordering for RAG Pipelines
//!
//! Retrieval-augmented generation degrades when the most relevant
//! context sits in the middle of the prompt ("lost in the middle").
//! This crate reorders retrieved chunks so that high-priority content
//! lands where models attend best: the start and end of the context
//! window.
//!
//! # Strategies
//!
//! | Strategy | Ordering |
//! |----------|----------|
//! | `ScoreSpread` | U-shaped interleave of priority ranks, or explicit start/end placement |
//! | `PreserveOrder` | document order within sources, sources by peak priority |
//! | `Chronological` | timestamp ascending, untimestamped chunks last |
//! | `Custom` | caller-supplied comparator |
//!
//! # Pipeline
//!
//! ```ascii
//! chunks ──► min_score filter ──► deduplicate ──► validate ──► score
//!                                                               │
//! output ◄── top_k ◄── token budget ◄── strategy ◄── group_by ◄─┘
//! ```
//!
//! Every stage is also exposed as a standalone function for callers that
//! need only one piece (see [`deduplicator`], [`scorer`], [`strategies`]).
//!
//! # Example
//!
//! ```ignore
//! use context_reorder::{Chunk, Reorderer, ReorderConfig, Strategy};
//!
//! let reorderer = Reorderer::new(
//!     ReorderConfig::default()
//!         .with_strategy(Strategy::ScoreSpread)
//!         .with_min_score(0.2)
//!         .with_deduplicate(true),
//! )?;
//!
//! let chunks = vec![
//!     Chunk::new("a", "first passage", 0.91),
//!     Chunk::new("b", "second passage", 0.47),
//! ];
//! let ordered = reorderer.reorder_sync(&chunks, None)?;
//! ```
//!
//! # See Also
//!
//! - [`crate::reorderer`] for the pipeline orchestrator
//! - [`crate::config`] for configuration and per-call overrides
//! - [`crate::evaluator`] for ordering-quality metrics

pub mod config;
pub mod deduplicator;
pub mod error;
pub mod evaluator;
pub mod grouper;
pub mod reorderer;
pub mod scorer;
pub mod serializer;
pub mod strategies;
pub mod tokenizer;
pub mod traits;
pub mod types;
pub mod validator;

pub use config::{
    merge_config, validate_config, ReorderConfig, ReorderOverrides, WeightOverrides,
};
pub use deduplicator::{deduplicate_chunks, trigram_similarity, DeduplicateOptions};
pub use error::{ReorderError, Result};
pub use evaluator::{
    key_point_precision, key_point_recall, ndcg, position_effectiveness,
    position_effectiveness_from_metadata, EvalOptions,
};
pub use grouper::{group_chunks, order_groups, DEFAULT_GROUP};
pub use reorderer::Reorderer;
pub use scorer::score_chunks;
pub use serializer::{deserialize_chunks, serialize_chunks};
pub use tokenizer::Tokenizer;
pub use traits::{Reranker, TokenCounter};
pub use types::{
    Chunk, ChunkMetadata, CustomComparator, DedupKeep, RerankerErrorHandler, ScoredChunk,
    ScoringWeights, Strategy,
};
pub use validator::validate_chunks;
