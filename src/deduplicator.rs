//! Exact and fuzzy chunk deduplication.
//!
//! # Modes
//!
//! ```ascii
//! threshold = 1.0 (default) ──► exact text equality, O(n) via map
//! threshold < 1.0           ──► trigram-Jaccard clustering, O(n²)
//! ```
//!
//! # Clustering behavior
//!
//! Fuzzy dedup uses single-pass greedy clustering: each unprocessed chunk
//! opens a cluster and every later unprocessed chunk with similarity at
//! or above the threshold merges into it. The clustering is **not**
//! transitively closed — if A matches B and B matches C but A does not
//! match C, then C is never merged into A's cluster once B has claimed
//! it. This is an accepted approximation of the greedy algorithm, not a
//! bug; callers relying on cluster contents should account for it.
//!
//! Fuzzy dedup is O(n²) — for large inputs (>500 chunks) prefer exact
//! dedup or pre-filtering.

use std::collections::{HashMap, HashSet};

use crate::types::{Chunk, DedupKeep};

/// Options for chunk deduplication.
#[derive(Debug, Clone, Copy)]
pub struct DeduplicateOptions {
    /// Similarity threshold (0-1). Chunks at or above this similarity are
    /// considered duplicates. Default: 1.0 (exact match only).
    pub threshold: f64,
    /// Survivor selection when duplicates are found.
    pub keep: DedupKeep,
}

impl Default for DeduplicateOptions {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            keep: DedupKeep::default(),
        }
    }
}

/// Jaccard similarity of two strings over their character trigram sets.
///
/// Symmetric, in `[0, 1]`, and 1 for identical strings. Strings shorter
/// than 3 characters produce no trigrams, so comparing a short string
/// against anything unequal yields 0 — even when the short string is a
/// substring of the longer one.
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.len() < 3 && b_chars.len() < 3 {
        return 0.0;
    }

    let trigrams_a = build_trigrams(&a_chars);
    let trigrams_b = build_trigrams(&b_chars);
    if trigrams_a.is_empty() || trigrams_b.is_empty() {
        return 0.0;
    }

    let intersection = trigrams_a.intersection(&trigrams_b).count();
    let union = trigrams_a.len() + trigrams_b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn build_trigrams(chars: &[char]) -> HashSet<String> {
    chars
        .windows(3)
        .map(|window| window.iter().collect())
        .collect()
}

/// Remove duplicate or near-duplicate chunks.
///
/// Output preserves the relative input order of surviving chunks. See the
/// module docs for the clustering caveats of fuzzy mode.
pub fn deduplicate_chunks(chunks: &[Chunk], options: &DeduplicateOptions) -> Vec<Chunk> {
    if chunks.len() <= 1 {
        return chunks.to_vec();
    }

    if options.threshold >= 1.0 {
        deduplicate_exact(chunks, options.keep)
    } else {
        deduplicate_fuzzy(chunks, options.threshold, options.keep)
    }
}

fn deduplicate_exact(chunks: &[Chunk], keep: DedupKeep) -> Vec<Chunk> {
    // text -> input index of the current survivor
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (i, chunk) in chunks.iter().enumerate() {
        match seen.get(chunk.text.as_str()) {
            None => {
                seen.insert(&chunk.text, i);
            }
            Some(&existing) => {
                if should_replace(&chunks[existing], existing, chunk, i, keep) {
                    seen.insert(&chunk.text, i);
                }
            }
        }
    }

    let mut survivor_indices: Vec<usize> = seen.into_values().collect();
    survivor_indices.sort_unstable();
    survivor_indices
        .into_iter()
        .map(|i| chunks[i].clone())
        .collect()
}

fn deduplicate_fuzzy(chunks: &[Chunk], threshold: f64, keep: DedupKeep) -> Vec<Chunk> {
    let n = chunks.len();
    let mut removed = vec![false; n];
    // survivor[i] = input index of the representative of the cluster
    // opened at i (may be replaced by a later merge).
    let mut survivor: Vec<usize> = (0..n).collect();

    for i in 0..n {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..n {
            if removed[j] {
                continue;
            }
            // Similarity is measured against the cluster opener's text,
            // not the current representative's.
            let sim = trigram_similarity(&chunks[i].text, &chunks[j].text);
            if sim >= threshold {
                if should_replace(&chunks[survivor[i]], i, &chunks[j], j, keep) {
                    survivor[i] = j;
                }
                removed[j] = true;
            }
        }
    }

    (0..n)
        .filter(|&i| !removed[i])
        .map(|i| chunks[survivor[i]].clone())
        .collect()
}

fn should_replace(
    existing: &Chunk,
    existing_index: usize,
    candidate: &Chunk,
    candidate_index: usize,
    keep: DedupKeep,
) -> bool {
    match keep {
        DedupKeep::HighestScore => candidate.score > existing.score,
        DedupKeep::First => candidate_index < existing_index,
        DedupKeep::Last => candidate_index > existing_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========== Trigram Similarity Tests ===========

    #[test]
    fn test_similarity_identical() {
        assert_eq!(trigram_similarity("hello world", "hello world"), 1.0);
        assert_eq!(trigram_similarity("", ""), 1.0);
        assert_eq!(trigram_similarity("ab", "ab"), 1.0);
    }

    #[test]
    fn test_similarity_short_unequal_strings() {
        assert_eq!(trigram_similarity("ab", "cd"), 0.0);
        assert_eq!(trigram_similarity("a", ""), 0.0);
        // Short string against a long one has no trigrams in common.
        assert_eq!(trigram_similarity("ab", "abcdefgh"), 0.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [
            ("the quick brown fox", "the quick brown cat"),
            ("abcdefgh", "cdefghij"),
            ("abc", "xyz"),
        ];
        for (a, b) in pairs {
            assert_eq!(trigram_similarity(a, b), trigram_similarity(b, a));
        }
    }

    #[test]
    fn test_similarity_range() {
        let sim = trigram_similarity("the quick brown fox", "the quick brown cat");
        assert!(sim > 0.0 && sim < 1.0);
    }

    #[test]
    fn test_similarity_known_value() {
        // "abcdefgh": {abc,bcd,cde,def,efg,fgh}; "cdefghij": {cde,def,efg,fgh,ghi,hij}
        // intersection 4, union 8
        let sim = trigram_similarity("abcdefgh", "cdefghij");
        assert!((sim - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert_eq!(trigram_similarity("aaaa", "bbbb"), 0.0);
    }

    // =========== Exact Dedup Tests ===========

    fn chunk(id: &str, text: &str, score: f64) -> Chunk {
        Chunk::new(id, text, score)
    }

    #[test]
    fn test_exact_dedup_distinct_texts_untouched() {
        let chunks = vec![chunk("a", "one", 0.1), chunk("b", "two", 0.2)];
        let out = deduplicate_chunks(&chunks, &DeduplicateOptions::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_exact_dedup_highest_score_wins() {
        let chunks = vec![
            chunk("a", "same", 0.3),
            chunk("b", "other", 0.9),
            chunk("c", "same", 0.8),
        ];
        let out = deduplicate_chunks(&chunks, &DeduplicateOptions::default());
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        // "c" wins its duplicate pair and keeps its own input position.
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_exact_dedup_score_tie_keeps_earlier() {
        let chunks = vec![chunk("a", "same", 0.5), chunk("b", "same", 0.5)];
        let out = deduplicate_chunks(&chunks, &DeduplicateOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn test_exact_dedup_keep_first() {
        let chunks = vec![chunk("a", "same", 0.1), chunk("b", "same", 0.9)];
        let options = DeduplicateOptions {
            keep: DedupKeep::First,
            ..Default::default()
        };
        let out = deduplicate_chunks(&chunks, &options);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn test_exact_dedup_keep_last() {
        let chunks = vec![chunk("a", "same", 0.9), chunk("b", "same", 0.1)];
        let options = DeduplicateOptions {
            keep: DedupKeep::Last,
            ..Default::default()
        };
        let out = deduplicate_chunks(&chunks, &options);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn test_exact_dedup_preserves_survivor_order() {
        let chunks = vec![
            chunk("a", "x", 0.1),
            chunk("b", "y", 0.2),
            chunk("c", "x", 0.05),
            chunk("d", "z", 0.3),
        ];
        let out = deduplicate_chunks(&chunks, &DeduplicateOptions::default());
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_dedup_single_chunk_passthrough() {
        let chunks = vec![chunk("a", "only", 0.5)];
        let out = deduplicate_chunks(&chunks, &DeduplicateOptions::default());
        assert_eq!(out.len(), 1);
        assert!(deduplicate_chunks(&[], &DeduplicateOptions::default()).is_empty());
    }

    // =========== Fuzzy Dedup Tests ===========

    #[test]
    fn test_fuzzy_dedup_merges_near_duplicates() {
        let chunks = vec![
            chunk("a", "the quick brown fox jumps over the lazy dog", 0.5),
            chunk("b", "the quick brown fox jumps over the lazy cat", 0.9),
            chunk("c", "completely unrelated text about databases", 0.3),
        ];
        let options = DeduplicateOptions {
            threshold: 0.5,
            keep: DedupKeep::HighestScore,
        };
        let out = deduplicate_chunks(&chunks, &options);
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_fuzzy_dedup_greedy_not_transitive() {
        // sim(a, b) = 0.5, sim(b, c) = 0.5, sim(a, c) = 0.2.
        // a opens a cluster and claims b; c never matches a directly, so
        // it survives even though it matches b. First cluster wins.
        let chunks = vec![
            chunk("a", "abcdefgh", 0.9),
            chunk("b", "cdefghij", 0.5),
            chunk("c", "efghijkl", 0.7),
        ];
        let options = DeduplicateOptions {
            threshold: 0.5,
            keep: DedupKeep::HighestScore,
        };
        let out = deduplicate_chunks(&chunks, &options);
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_fuzzy_dedup_keep_last_replaces_representative() {
        let chunks = vec![
            chunk("a", "the quick brown fox jumps over the lazy dog", 0.9),
            chunk("b", "the quick brown fox jumps over the lazy cat", 0.1),
        ];
        let options = DeduplicateOptions {
            threshold: 0.5,
            keep: DedupKeep::Last,
        };
        let out = deduplicate_chunks(&chunks, &options);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn test_fuzzy_dedup_survivors_in_cluster_opener_order() {
        let chunks = vec![
            chunk("a", "first topic sentence here", 0.2),
            chunk("b", "second topic sentence here", 0.8),
            chunk("c", "first topic sentence here!", 0.9),
        ];
        let options = DeduplicateOptions {
            threshold: 0.6,
            keep: DedupKeep::HighestScore,
        };
        let out = deduplicate_chunks(&chunks, &options);
        // "c" replaces "a" as representative but occupies a's cluster slot,
        // ahead of any clusters opened later.
        assert_eq!(out[0].id, "c");
    }

    #[test]
    fn test_fuzzy_threshold_zero_collapses_everything() {
        // At threshold 0 every pair matches (similarity >= 0).
        let chunks = vec![
            chunk("a", "alpha", 0.1),
            chunk("b", "beta", 0.9),
            chunk("c", "gamma", 0.5),
        ];
        let options = DeduplicateOptions {
            threshold: 0.0,
            keep: DedupKeep::HighestScore,
        };
        let out = deduplicate_chunks(&chunks, &options);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }
}
