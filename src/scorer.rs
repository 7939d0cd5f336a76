//! Priority score computation.
//!
//! # Algorithm
//!
//! ```ascii
//! priority = score·w.similarity + normTime·w.time + normSection·w.section
//!
//! normTime / normSection: min-max normalization into [0, 1],
//! computed once per run over the *defined* values only.
//! ```
//!
//! A chunk missing a field contributes 0 for that term (the field is also
//! excluded from the run's min/max). When min equals max across the set,
//! every chunk normalizes to 0, which avoids division by zero.

use crate::types::{Chunk, ScoredChunk, ScoringWeights};

fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mut min = values[0];
    let mut max = values[0];
    for &v in &values[1..] {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    (min, max)
}

fn normalize(value: Option<f64>, min: f64, max: f64) -> f64 {
    match value {
        None => 0.0,
        Some(_) if max == min => 0.0,
        Some(v) => (v - min) / (max - min),
    }
}

/// Compute a priority score for each chunk and assign `original_index`
/// by position in the input order.
pub fn score_chunks(chunks: &[Chunk], weights: &ScoringWeights) -> Vec<ScoredChunk> {
    let mut defined_timestamps = Vec::new();
    let mut defined_sections = Vec::new();

    for chunk in chunks {
        if let Some(meta) = &chunk.metadata {
            if let Some(ts) = meta.timestamp {
                defined_timestamps.push(ts);
            }
            if let Some(sec) = meta.section_index {
                defined_sections.push(sec);
            }
        }
    }

    let (min_ts, max_ts) = min_max(&defined_timestamps);
    let (min_sec, max_sec) = min_max(&defined_sections);

    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let timestamp = chunk.metadata.as_ref().and_then(|m| m.timestamp);
            let section = chunk.metadata.as_ref().and_then(|m| m.section_index);

            let normalized_time = normalize(timestamp, min_ts, max_ts);
            let normalized_section = normalize(section, min_sec, max_sec);

            let priority_score = chunk.score * weights.similarity
                + normalized_time * weights.time
                + normalized_section * weights.section;

            ScoredChunk {
                chunk: chunk.clone(),
                priority_score,
                original_index: index,
            }
        })
        .collect()
}
