//! Reorderer configuration.
//!
//! # Architecture
//!
//! ```ascii
//! ┌───────────────────────────────────────────────────────────┐
//! │                     ReorderConfig                         │
//! ├───────────────────────────────────────────────────────────┤
//! │ strategy              ─────► which reorder algorithm      │
//! │ weights               ─────► priority score composition   │
//! │ start_count/end_count ─────► scoreSpread edge placement   │
//! │ group_by              ─────► partition before reordering  │
//! │ reranker              ─────► async score refinement       │
//! │ custom_comparator     ─────► Custom strategy ordering     │
//! │ min_score             ─────► pre-filter threshold         │
//! │ max_tokens + counter  ─────► output token budget          │
//! │ on_reranker_error     ─────► recovered-failure callback   │
//! │ include_priority_score─────► surface priority in metadata │
//! │ deduplicate (+thresh, │                                   │
//! │   +keep)              ─────► exact or fuzzy dedup         │
//! │ top_k                 ─────► result cap                   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ReorderConfig` is always fully resolved: every option carries its
//! default and the orchestrator never sees a partial view. Per-call
//! adjustments go through [`ReorderOverrides`], which shallow-replaces
//! top-level fields and field-merges the `weights` sub-record; the merged
//! result is re-validated before use, even for an empty input list.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{ReorderError, Result};
use crate::traits::{Reranker, TokenCounter};
use crate::types::{
    Chunk, CustomComparator, DedupKeep, RerankerErrorHandler, ScoringWeights, Strategy,
};

/// Fully resolved reorderer configuration.
///
/// Construct with [`ReorderConfig::default`] and the `with_*` builders:
///
/// ```ignore
/// use context_reorder::{ReorderConfig, Strategy};
///
/// let config = ReorderConfig::default()
///     .with_strategy(Strategy::Chronological)
///     .with_min_score(0.3)
///     .with_deduplicate(true);
/// ```
#[derive(Clone)]
pub struct ReorderConfig {
    /// Reordering algorithm. Default: `Strategy::ScoreSpread`.
    pub strategy: Strategy,
    /// Weights for priority score computation.
    pub weights: ScoringWeights,
    /// Number of top chunks to place at the start (ScoreSpread only).
    pub start_count: Option<usize>,
    /// Number of top chunks to place at the end (ScoreSpread only).
    pub end_count: Option<usize>,
    /// Metadata field to group chunks by before reordering.
    pub group_by: Option<String>,
    /// External reranker to refine scores before reordering.
    pub reranker: Option<Arc<dyn Reranker>>,
    /// Comparison function for the `Custom` strategy.
    pub custom_comparator: Option<CustomComparator>,
    /// Minimum score threshold; chunks below this are dropped up front.
    pub min_score: Option<f64>,
    /// Maximum cumulative token count of the output.
    pub max_tokens: Option<usize>,
    /// Token counter. Required when `max_tokens` is set.
    pub token_counter: Option<Arc<dyn TokenCounter>>,
    /// Called when the reranker fails. Default: ignored.
    pub on_reranker_error: Option<RerankerErrorHandler>,
    /// If true, surface `priorityScore` in output chunk metadata.
    pub include_priority_score: bool,
    /// Enable deduplication before reordering.
    pub deduplicate: bool,
    /// Similarity threshold for deduplication. 1.0 (default) = exact match.
    pub deduplicate_threshold: f64,
    /// Survivor selection for duplicates. Default: `DedupKeep::HighestScore`.
    pub deduplicate_keep: DedupKeep,
    /// Maximum number of chunks to return, applied after the token budget.
    pub top_k: Option<usize>,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            weights: ScoringWeights::default(),
            start_count: None,
            end_count: None,
            group_by: None,
            reranker: None,
            custom_comparator: None,
            min_score: None,
            max_tokens: None,
            token_counter: None,
            on_reranker_error: None,
            include_priority_score: false,
            deduplicate: false,
            deduplicate_threshold: 1.0,
            deduplicate_keep: DedupKeep::default(),
            top_k: None,
        }
    }
}

impl fmt::Debug for ReorderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderConfig")
            .field("strategy", &self.strategy)
            .field("weights", &self.weights)
            .field("start_count", &self.start_count)
            .field("end_count", &self.end_count)
            .field("group_by", &self.group_by)
            .field("reranker", &self.reranker.as_ref().map(|_| "<reranker>"))
            .field(
                "custom_comparator",
                &self.custom_comparator.as_ref().map(|_| "<fn>"),
            )
            .field("min_score", &self.min_score)
            .field("max_tokens", &self.max_tokens)
            .field(
                "token_counter",
                &self.token_counter.as_ref().map(|_| "<fn>"),
            )
            .field(
                "on_reranker_error",
                &self.on_reranker_error.as_ref().map(|_| "<fn>"),
            )
            .field("include_priority_score", &self.include_priority_score)
            .field("deduplicate", &self.deduplicate)
            .field("deduplicate_threshold", &self.deduplicate_threshold)
            .field("deduplicate_keep", &self.deduplicate_keep)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl ReorderConfig {
    /// Set the reordering strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the ScoreSpread start count.
    pub fn with_start_count(mut self, count: usize) -> Self {
        self.start_count = Some(count);
        self
    }

    /// Set the ScoreSpread end count.
    pub fn with_end_count(mut self, count: usize) -> Self {
        self.end_count = Some(count);
        self
    }

    /// Group chunks by a metadata field before reordering.
    pub fn with_group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    /// Attach an external reranker (async entry points only).
    pub fn with_reranker(mut self, reranker: impl Reranker + 'static) -> Self {
        self.reranker = Some(Arc::new(reranker));
        self
    }

    /// Provide the comparator for the `Custom` strategy.
    pub fn with_custom_comparator(
        mut self,
        comparator: impl Fn(&Chunk, &Chunk) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.custom_comparator = Some(Arc::new(comparator));
        self
    }

    /// Drop chunks scoring below this threshold before reordering.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Cap the output at a cumulative token budget.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Provide the token counter used by the token budget.
    pub fn with_token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.token_counter = Some(Arc::new(counter));
        self
    }

    /// Register a handler for recovered reranker failures.
    pub fn with_on_reranker_error(
        mut self,
        handler: impl Fn(&ReorderError) + Send + Sync + 'static,
    ) -> Self {
        self.on_reranker_error = Some(Arc::new(handler));
        self
    }

    /// Surface `priorityScore` in output chunk metadata.
    pub fn with_include_priority_score(mut self, include: bool) -> Self {
        self.include_priority_score = include;
        self
    }

    /// Enable deduplication.
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Set the fuzzy deduplication threshold (1.0 = exact match only).
    pub fn with_deduplicate_threshold(mut self, threshold: f64) -> Self {
        self.deduplicate_threshold = threshold;
        self
    }

    /// Set the duplicate survivor policy.
    pub fn with_deduplicate_keep(mut self, keep: DedupKeep) -> Self {
        self.deduplicate_keep = keep;
        self
    }

    /// Cap the number of returned chunks.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// Per-field overrides of [`ScoringWeights`]. Unset fields keep the
/// instance's resolved value.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightOverrides {
    /// Override for the relevance weight.
    pub similarity: Option<f64>,
    /// Override for the timestamp weight.
    pub time: Option<f64>,
    /// Override for the section-index weight.
    pub section: Option<f64>,
}

/// Per-call configuration overrides.
///
/// Every field is optional: a set field shallow-replaces the instance
/// value for the duration of one call; `weights` merges field-wise.
#[derive(Clone, Default)]
pub struct ReorderOverrides {
    /// Override the reordering strategy.
    pub strategy: Option<Strategy>,
    /// Field-wise weight overrides.
    pub weights: WeightOverrides,
    /// Override the ScoreSpread start count.
    pub start_count: Option<usize>,
    /// Override the ScoreSpread end count.
    pub end_count: Option<usize>,
    /// Override the grouping field.
    pub group_by: Option<String>,
    /// Override the reranker (rejected by the synchronous entry point).
    pub reranker: Option<Arc<dyn Reranker>>,
    /// Override the custom comparator.
    pub custom_comparator: Option<CustomComparator>,
    /// Override the minimum score threshold.
    pub min_score: Option<f64>,
    /// Override the token budget.
    pub max_tokens: Option<usize>,
    /// Override the token counter.
    pub token_counter: Option<Arc<dyn TokenCounter>>,
    /// Override the reranker failure handler.
    pub on_reranker_error: Option<RerankerErrorHandler>,
    /// Override priority-score surfacing.
    pub include_priority_score: Option<bool>,
    /// Override deduplication on/off.
    pub deduplicate: Option<bool>,
    /// Override the deduplication threshold.
    pub deduplicate_threshold: Option<f64>,
    /// Override the duplicate survivor policy.
    pub deduplicate_keep: Option<DedupKeep>,
    /// Override the result cap.
    pub top_k: Option<usize>,
}

impl ReorderOverrides {
    /// Override the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Override individual weight fields.
    pub fn with_weights(mut self, weights: WeightOverrides) -> Self {
        self.weights = weights;
        self
    }

    /// Override the minimum score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Override the grouping field.
    pub fn with_group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    /// Override the reranker for this call.
    pub fn with_reranker(mut self, reranker: impl Reranker + 'static) -> Self {
        self.reranker = Some(Arc::new(reranker));
        self
    }

    /// Override the custom comparator.
    pub fn with_custom_comparator(
        mut self,
        comparator: impl Fn(&Chunk, &Chunk) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.custom_comparator = Some(Arc::new(comparator));
        self
    }

    /// Override deduplication on/off.
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = Some(deduplicate);
        self
    }

    /// Override the deduplication threshold.
    pub fn with_deduplicate_threshold(mut self, threshold: f64) -> Self {
        self.deduplicate_threshold = Some(threshold);
        self
    }

    /// Override the duplicate survivor policy.
    pub fn with_deduplicate_keep(mut self, keep: DedupKeep) -> Self {
        self.deduplicate_keep = Some(keep);
        self
    }

    /// Override the result cap.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Override the token budget.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Override the token counter.
    pub fn with_token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.token_counter = Some(Arc::new(counter));
        self
    }

    /// Override the reranker failure handler.
    pub fn with_on_reranker_error(
        mut self,
        handler: impl Fn(&ReorderError) + Send + Sync + 'static,
    ) -> Self {
        self.on_reranker_error = Some(Arc::new(handler));
        self
    }

    /// Override priority-score surfacing.
    pub fn with_include_priority_score(mut self, include: bool) -> Self {
        self.include_priority_score = Some(include);
        self
    }

    /// Override the ScoreSpread start count.
    pub fn with_start_count(mut self, count: usize) -> Self {
        self.start_count = Some(count);
        self
    }

    /// Override the ScoreSpread end count.
    pub fn with_end_count(mut self, count: usize) -> Self {
        self.end_count = Some(count);
        self
    }
}

/// Merge per-call overrides over a resolved base configuration.
///
/// Top-level fields are shallow-replaced when set; `weights` merges
/// field-wise with the base weights. The caller is responsible for
/// re-validating the result.
pub fn merge_config(base: &ReorderConfig, overrides: &ReorderOverrides) -> ReorderConfig {
    ReorderConfig {
        strategy: overrides.strategy.unwrap_or(base.strategy),
        weights: ScoringWeights {
            similarity: overrides
                .weights
                .similarity
                .unwrap_or(base.weights.similarity),
            time: overrides.weights.time.unwrap_or(base.weights.time),
            section: overrides.weights.section.unwrap_or(base.weights.section),
        },
        start_count: overrides.start_count.or(base.start_count),
        end_count: overrides.end_count.or(base.end_count),
        group_by: overrides.group_by.clone().or_else(|| base.group_by.clone()),
        reranker: overrides.reranker.clone().or_else(|| base.reranker.clone()),
        custom_comparator: overrides
            .custom_comparator
            .clone()
            .or_else(|| base.custom_comparator.clone()),
        min_score: overrides.min_score.or(base.min_score),
        max_tokens: overrides.max_tokens.or(base.max_tokens),
        token_counter: overrides
            .token_counter
            .clone()
            .or_else(|| base.token_counter.clone()),
        on_reranker_error: overrides
            .on_reranker_error
            .clone()
            .or_else(|| base.on_reranker_error.clone()),
        include_priority_score: overrides
            .include_priority_score
            .unwrap_or(base.include_priority_score),
        deduplicate: overrides.deduplicate.unwrap_or(base.deduplicate),
        deduplicate_threshold: overrides
            .deduplicate_threshold
            .unwrap_or(base.deduplicate_threshold),
        deduplicate_keep: overrides.deduplicate_keep.unwrap_or(base.deduplicate_keep),
        top_k: overrides.top_k.or(base.top_k),
    }
}

/// Validate a resolved configuration. Fails before any chunk processing
/// begins, both at construction and on every per-call override merge.
pub fn validate_config(config: &ReorderConfig) -> Result<()> {
    if config.strategy == Strategy::Custom && config.custom_comparator.is_none() {
        return Err(ReorderError::Validation(
            "Custom strategy requires a custom_comparator function".to_string(),
        ));
    }

    if config.strategy == Strategy::PreserveOrder && config.group_by.as_deref() == Some("sourceId")
    {
        return Err(ReorderError::Validation(
            "PreserveOrder strategy already groups by sourceId internally. \
             Setting group_by: \"sourceId\" causes redundant double-grouping. \
             Remove group_by or use a different strategy."
                .to_string(),
        ));
    }

    if config.max_tokens.is_some() && config.token_counter.is_none() {
        return Err(ReorderError::Validation(
            "max_tokens requires a token_counter function".to_string(),
        ));
    }

    if let Some(min_score) = config.min_score {
        if !min_score.is_finite() {
            return Err(ReorderError::Validation(
                "min_score must be a finite number".to_string(),
            ));
        }
    }

    let threshold = config.deduplicate_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ReorderError::Validation(
            "deduplicate_threshold must be a number between 0 and 1".to_string(),
        ));
    }

    for (name, value) in [
        ("similarity", config.weights.similarity),
        ("time", config.weights.time),
        ("section", config.weights.section),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ReorderError::Validation(format!(
                "weights.{name} must be a non-negative number"
            )));
        }
    }

    if config.top_k == Some(0) {
        return Err(ReorderError::Validation(
            "top_k must be a positive integer".to_string(),
        ));
    }

    Ok(())
}
