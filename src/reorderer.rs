//! Pipeline orchestrator for chunk reordering.
//!
//! # Pipeline
//!
//! Fixed 9-stage pipeline, each stage skippable via configuration:
//!
//! ```ascii
//! input chunks
//!   │ 1. drop chunks below min_score
//!   │ 2. deduplicate (exact or fuzzy)
//!   │ 3. empty? ──► return [] immediately
//!   │ 4. validate structure (non-empty id, finite score) — fatal
//!   │ 5. score (priority_score + original_index)
//!   │ 6. group_by? per-group strategy apply : whole-list strategy apply
//!   │ 7. strip internals (optionally re-surface priorityScore)
//!   │ 8. token budget — cut at first chunk exceeding max_tokens
//!   │ 9. top_k cap
//!   ▼
//! ordered chunks
//! ```
//!
//! # Entry Points
//!
//! - [`Reorderer::reorder_sync`] — synchronous; rejects a reranker
//!   passed via overrides.
//! - [`Reorderer::reorder`] — async; invokes the configured reranker
//!   first (when a query is supplied), falling back to original scores
//!   on any reranker failure.
//! - [`Reorderer::reorder_stream`] — same semantics as `reorder`, with
//!   the result exposed as a finite, forward-only [`Stream`]. The full
//!   result is materialized internally before yielding, so this does not
//!   reduce memory use or time-to-first-chunk — a documented limitation,
//!   not a streaming optimization.
//!
//! # Concurrency
//!
//! The resolved configuration is immutable after construction; each call
//! works on its own copies, so one `Reorderer` may serve concurrent
//! calls safely. The single suspension point is the reranker invocation.
//! There is no internal timeout: a reranker that never settles stalls
//! that call (caller responsibility).
//!
//! # Example
//!
//! ```ignore
//! use context_reorder::{Chunk, Reorderer, ReorderConfig};
//!
//! let reorderer = Reorderer::new(ReorderConfig::default().with_min_score(0.2))?;
//! let ordered = reorderer.reorder_sync(&chunks, None)?;
//! ```

use futures::stream::{self, Stream};
use tracing::debug;

use crate::config::{merge_config, validate_config, ReorderConfig, ReorderOverrides};
use crate::deduplicator::{deduplicate_chunks, DeduplicateOptions};
use crate::error::{ReorderError, Result};
use crate::grouper::{group_chunks, order_groups};
use crate::scorer::score_chunks;
use crate::strategies::{chronological, custom_sort, preserve_order, score_spread};
use crate::traits::TokenCounter;
use crate::types::{Chunk, ScoredChunk, Strategy};
use crate::validator::validate_chunks;

/// Main orchestrator for chunk reordering in RAG pipelines.
pub struct Reorderer {
    config: ReorderConfig,
}

impl Reorderer {
    /// Create a reorderer with the given configuration. Validation
    /// failures surface here, before any chunk is processed.
    pub fn new(config: ReorderConfig) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self { config })
    }

    /// Returns a structurally independent copy of the resolved
    /// configuration. Mutating the copy (including nested weight
    /// fields) never affects subsequent calls.
    pub fn get_config(&self) -> ReorderConfig {
        self.config.clone()
    }

    fn merge_overrides(&self, overrides: Option<&ReorderOverrides>) -> Result<ReorderConfig> {
        match overrides {
            // The instance config was validated at construction.
            None => Ok(self.config.clone()),
            Some(overrides) => {
                let merged = merge_config(&self.config, overrides);
                validate_config(&merged)?;
                Ok(merged)
            }
        }
    }

    /// Synchronous reorder. Does not support a reranker — use the async
    /// [`reorder`](Self::reorder) for that; a reranker passed via
    /// overrides is rejected here.
    pub fn reorder_sync(
        &self,
        chunks: &[Chunk],
        overrides: Option<&ReorderOverrides>,
    ) -> Result<Vec<Chunk>> {
        if let Some(overrides) = overrides {
            if overrides.reranker.is_some() {
                return Err(ReorderError::Validation(
                    "reranker cannot be used with reorder_sync(). \
                     Use the async reorder() method instead."
                        .to_string(),
                ));
            }
        }
        let config = self.merge_overrides(overrides)?;
        execute_pipeline(chunks.to_vec(), &config)
    }

    /// Async reorder with optional reranker integration.
    ///
    /// When a reranker is configured and a query is supplied, the
    /// reranker refines scores before the pipeline runs. Any reranker
    /// failure is forwarded to `on_reranker_error` (exactly once) and
    /// the pipeline proceeds with the original scores.
    pub async fn reorder(
        &self,
        chunks: &[Chunk],
        query: Option<&str>,
        overrides: Option<&ReorderOverrides>,
    ) -> Result<Vec<Chunk>> {
        // Merge and validate before the empty-input check: bad overrides
        // fail even for an empty list.
        let config = self.merge_overrides(overrides)?;

        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut working = chunks.to_vec();

        if let (Some(reranker), Some(query)) = (config.reranker.as_ref(), query) {
            match reranker.rerank(&working, query).await {
                Ok(rescored) => working = rescored,
                Err(error) => {
                    debug!(%error, "reranker failed; falling back to original scores");
                    if let Some(handler) = &config.on_reranker_error {
                        handler(&error);
                    }
                }
            }
        }

        execute_pipeline(working, &config)
    }

    /// Reorder and expose the result as a stream of chunks.
    ///
    /// The ordering is identical to [`reorder`](Self::reorder) for the
    /// same input and configuration; the stream is computed in one shot
    /// and then yielded element-by-element. Each call returns a fresh
    /// stream.
    pub async fn reorder_stream(
        &self,
        chunks: &[Chunk],
        query: Option<&str>,
        overrides: Option<&ReorderOverrides>,
    ) -> Result<impl Stream<Item = Chunk>> {
        let result = self.reorder(chunks, query, overrides).await?;
        Ok(stream::iter(result))
    }
}

impl Default for Reorderer {
    fn default() -> Self {
        // The default configuration always validates.
        Self {
            config: ReorderConfig::default(),
        }
    }
}

fn execute_pipeline(chunks: Vec<Chunk>, config: &ReorderConfig) -> Result<Vec<Chunk>> {
    let mut working = chunks;

    if let Some(min_score) = config.min_score {
        working.retain(|c| c.score >= min_score);
    }

    if config.deduplicate {
        working = deduplicate_chunks(
            &working,
            &DeduplicateOptions {
                threshold: config.deduplicate_threshold,
                keep: config.deduplicate_keep,
            },
        );
    }

    if working.is_empty() {
        return Ok(Vec::new());
    }

    validate_chunks(&working)?;

    let scored = score_chunks(&working, &config.weights);
    debug!(
        chunks = scored.len(),
        strategy = ?config.strategy,
        group_by = ?config.group_by,
        "applying reorder strategy"
    );

    let result: Vec<ScoredChunk> = match &config.group_by {
        Some(field) => {
            let groups = order_groups(group_chunks(scored, field));
            let mut out = Vec::new();
            for (_, group) in groups {
                out.extend(apply_strategy(group, config)?);
            }
            out
        }
        None => apply_strategy(scored, config)?,
    };

    let mut output: Vec<Chunk> = result
        .into_iter()
        .map(|scored| strip_internal_fields(scored, config.include_priority_score))
        .collect();

    if let (Some(max_tokens), Some(counter)) = (config.max_tokens, config.token_counter.as_ref()) {
        output = apply_token_budget(output, max_tokens, counter.as_ref());
    }

    if let Some(top_k) = config.top_k {
        if output.len() > top_k {
            output.truncate(top_k);
        }
    }

    Ok(output)
}

fn apply_strategy(chunks: Vec<ScoredChunk>, config: &ReorderConfig) -> Result<Vec<ScoredChunk>> {
    Ok(match config.strategy {
        Strategy::ScoreSpread => score_spread(chunks, config.start_count, config.end_count),
        Strategy::PreserveOrder => preserve_order(chunks),
        Strategy::Chronological => chronological(chunks),
        Strategy::Custom => {
            // Guaranteed by config validation; kept as an error rather
            // than a panic since strategies run deep inside the pipeline.
            let comparator = config.custom_comparator.as_ref().ok_or_else(|| {
                ReorderError::Validation(
                    "Custom strategy requires a custom_comparator function".to_string(),
                )
            })?;
            custom_sort(chunks, comparator)
        }
    })
}

fn strip_internal_fields(scored: ScoredChunk, include_priority_score: bool) -> Chunk {
    let mut chunk = scored.chunk;
    if include_priority_score {
        if let Some(priority) = serde_json::Number::from_f64(scored.priority_score) {
            chunk
                .metadata
                .get_or_insert_with(Default::default)
                .extra
                .insert(
                    "priorityScore".to_string(),
                    serde_json::Value::Number(priority),
                );
        }
    }
    chunk
}

fn apply_token_budget(
    chunks: Vec<Chunk>,
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> Vec<Chunk> {
    let mut total = 0usize;
    let mut result = Vec::new();

    for chunk in chunks {
        let tokens = counter.count(&chunk.text);
        if total + tokens > max_tokens {
            break;
        }
        total += tokens;
        result.push(chunk);
    }

    result
}
