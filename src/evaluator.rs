//! Evaluation metrics for reordered chunk lists.
//!
//! Four independent, stateless metrics:
//!
//! | Metric | Measures |
//! |--------|----------|
//! | [`key_point_recall`] | fraction of key points found in any chunk text |
//! | [`key_point_precision`] | fraction of chunks containing at least one key point |
//! | [`position_effectiveness`] | U-shape-weighted average of priority scores |
//! | [`ndcg`] | ranking quality against the ideal ordering |

use std::cmp::Ordering;

use crate::types::{Chunk, ScoredChunk};

/// Options for key-point matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    /// Use case-insensitive substring matching. Default: false.
    pub case_insensitive: bool,
}

fn contains_key_point(text: &str, key_point: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        text.to_lowercase().contains(&key_point.to_lowercase())
    } else {
        text.contains(key_point)
    }
}

/// Key-point recall: fraction of key points found as substrings in any
/// chunk text. Returns 0 for an empty key-point list.
pub fn key_point_recall(key_points: &[String], chunk_texts: &[String], options: EvalOptions) -> f64 {
    if key_points.is_empty() {
        return 0.0;
    }
    let found = key_points
        .iter()
        .filter(|kp| {
            chunk_texts
                .iter()
                .any(|text| contains_key_point(text, kp, options.case_insensitive))
        })
        .count();
    found as f64 / key_points.len() as f64
}

/// Key-point precision: fraction of chunks whose text contains at least
/// one key point. Returns 0 for an empty chunk list.
pub fn key_point_precision(
    key_points: &[String],
    chunk_texts: &[String],
    options: EvalOptions,
) -> f64 {
    if chunk_texts.is_empty() {
        return 0.0;
    }
    let matching = chunk_texts
        .iter()
        .filter(|text| {
            key_points
                .iter()
                .any(|kp| contains_key_point(text, kp, options.case_insensitive))
        })
        .count();
    matching as f64 / chunk_texts.len() as f64
}

/// Position effectiveness over scored chunks: a weighted average of
/// priority scores where the weights `((i - mid) / mid)²` follow a
/// U-shaped curve, rewarding high-priority chunks at the first and last
/// positions.
pub fn position_effectiveness(chunks: &[ScoredChunk]) -> f64 {
    let priorities: Vec<f64> = chunks.iter().map(|c| c.priority_score).collect();
    u_shaped_average(&priorities)
}

/// Position effectiveness over pipeline output, reading the priority
/// from the re-surfaced `priorityScore` metadata key (requires
/// `include_priority_score`). Chunks without the key contribute 0.
pub fn position_effectiveness_from_metadata(chunks: &[Chunk]) -> f64 {
    let priorities: Vec<f64> = chunks
        .iter()
        .map(|c| {
            c.metadata
                .as_ref()
                .and_then(|m| m.extra.get("priorityScore"))
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
        })
        .collect();
    u_shaped_average(&priorities)
}

fn u_shaped_average(priorities: &[f64]) -> f64 {
    let n = priorities.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return priorities[0];
    }

    let mid = (n as f64 - 1.0) / 2.0;
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for (i, &priority) in priorities.iter().enumerate() {
        let offset = (i as f64 - mid) / mid;
        let weight = offset * offset;
        weighted_sum += priority * weight;
        weight_sum += weight;
    }

    weighted_sum / weight_sum
}

/// Normalized Discounted Cumulative Gain over a score sequence, treating
/// scores as relevance labels for their positions.
///
/// Assumes non-negative scores (standard in IR); negative scores can
/// push the result outside `[0, 1]`. Returns 0 when the ideal DCG is 0.
pub fn ndcg(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let dcg = discounted_gain(scores);

    let mut ideal = scores.to_vec();
    ideal.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    let idcg = discounted_gain(&ideal);

    if idcg == 0.0 {
        0.0
    } else {
        dcg / idcg
    }
}

fn discounted_gain(scores: &[f64]) -> f64 {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| score / (i as f64 + 2.0).log2())
        .sum()
}
