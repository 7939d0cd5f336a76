//! PreserveOrder strategy (OP-RAG style).
//!
//! Groups chunks by `sourceId` and keeps document order within each
//! source: ascending `sectionIndex`, falling back to `original_index`
//! when the section is missing. Groups are concatenated most-relevant
//! source first (by each group's maximum priority score).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::ScoredChunk;

/// Reorder chunks so each source document reads in order, with the most
/// relevant document's chunks first.
pub fn preserve_order(chunks: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    if chunks.is_empty() {
        return chunks;
    }

    // Group by sourceId, missing -> empty-string group, first-seen order.
    let mut groups: Vec<(String, Vec<ScoredChunk>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for chunk in chunks {
        let source_id = chunk
            .chunk
            .metadata
            .as_ref()
            .and_then(|m| m.source_id.clone())
            .unwrap_or_default();

        match index.get(&source_id) {
            Some(&slot) => groups[slot].1.push(chunk),
            None => {
                index.insert(source_id.clone(), groups.len());
                groups.push((source_id, vec![chunk]));
            }
        }
    }

    // Document order within each group.
    for (_, group) in &mut groups {
        group.sort_by(|a, b| {
            let sec_a = section_or_index(a);
            let sec_b = section_or_index(b);
            sec_a
                .partial_cmp(&sec_b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.original_index.cmp(&b.original_index))
        });
    }

    // Most relevant document first.
    groups.sort_by(|(_, a), (_, b)| {
        max_priority(b)
            .partial_cmp(&max_priority(a))
            .unwrap_or(Ordering::Equal)
    });

    groups.into_iter().flat_map(|(_, group)| group).collect()
}

fn section_or_index(chunk: &ScoredChunk) -> f64 {
    chunk
        .chunk
        .metadata
        .as_ref()
        .and_then(|m| m.section_index)
        .unwrap_or(chunk.original_index as f64)
}

fn max_priority(chunks: &[ScoredChunk]) -> f64 {
    chunks
        .iter()
        .fold(f64::NEG_INFINITY, |max, c| max.max(c.priority_score))
}
