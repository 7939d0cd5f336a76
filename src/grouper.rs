//! Metadata-based chunk grouping.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::ScoredChunk;

/// Group key for chunks that lack the grouping field.
pub const DEFAULT_GROUP: &str = "__default__";

/// Partition chunks into groups by the string-coerced value of a metadata
/// field. Chunks missing the field fall into one shared default group.
///
/// Groups come back in first-seen order and members retain their relative
/// input order within a group.
pub fn group_chunks(chunks: Vec<ScoredChunk>, group_by: &str) -> Vec<(String, Vec<ScoredChunk>)> {
    let mut groups: Vec<(String, Vec<ScoredChunk>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for chunk in chunks {
        let key = chunk
            .chunk
            .metadata
            .as_ref()
            .and_then(|m| m.group_key(group_by))
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());

        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(chunk),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![chunk]));
            }
        }
    }

    groups
}

/// Order groups by each group's maximum priority score, descending.
/// Ties keep first-seen group order (the sort is stable).
pub fn order_groups(
    mut groups: Vec<(String, Vec<ScoredChunk>)>,
) -> Vec<(String, Vec<ScoredChunk>)> {
    groups.sort_by(|(_, a), (_, b)| {
        let max_a = max_priority(a);
        let max_b = max_priority(b);
        max_b.partial_cmp(&max_a).unwrap_or(Ordering::Equal)
    });
    groups
}

fn max_priority(chunks: &[ScoredChunk]) -> f64 {
    chunks
        .iter()
        .fold(f64::NEG_INFINITY, |max, c| max.max(c.priority_score))
}
