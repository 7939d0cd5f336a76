//! ScoreSpread strategy: U-shaped priority placement.
//!
//! # Algorithm
//!
//! ```ascii
//! ranks (priority desc):   r0  r1  r2  r3  r4
//!
//! alternating placement:   r0  r2  r4  r3  r1
//!                          ▲───────────────▲
//!                          best at both edges, worst in the middle
//!
//! with start/end counts:   [top S in rank order] [rest] [next E in rank order]
//! ```
//!
//! Exploits LLM primacy/recency bias: attention degrades in the middle of
//! a long context, so the highest-value chunks go to the edges.

use std::cmp::Ordering;

use crate::types::ScoredChunk;

fn sort_by_priority(mut chunks: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    chunks.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.original_index.cmp(&b.original_index))
    });
    chunks
}

/// Reorder chunks so the highest-priority ones land at the start and end
/// of the output.
///
/// Without counts, ranks alternate between front and back (rank 0 to the
/// front, rank 1 to the back, rank 2 to the front, ...). With both
/// `start_count` and `end_count`, the top `start_count` ranks go to the
/// front in rank order, the next `end_count` to the back in rank order,
/// and the rest keep rank order in the middle. When the counts meet or
/// exceed the chunk count, the alternating form is used instead.
pub fn score_spread(
    chunks: Vec<ScoredChunk>,
    start_count: Option<usize>,
    end_count: Option<usize>,
) -> Vec<ScoredChunk> {
    if chunks.is_empty() {
        return chunks;
    }

    let sorted = sort_by_priority(chunks);

    match (start_count, end_count) {
        (Some(start), Some(end)) => spread_with_counts(sorted, start, end),
        _ => spread_interleave(sorted),
    }
}

fn spread_interleave(sorted: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    let n = sorted.len();
    let mut result: Vec<Option<ScoredChunk>> = (0..n).map(|_| None).collect();
    let mut front = 0;
    let mut back = n - 1;

    for (rank, chunk) in sorted.into_iter().enumerate() {
        if rank % 2 == 0 {
            result[front] = Some(chunk);
            front += 1;
        } else {
            result[back] = Some(chunk);
            back -= 1;
        }
    }

    result.into_iter().flatten().collect()
}

fn spread_with_counts(
    sorted: Vec<ScoredChunk>,
    start_count: usize,
    end_count: usize,
) -> Vec<ScoredChunk> {
    if start_count + end_count >= sorted.len() {
        return spread_interleave(sorted);
    }

    let mut start = sorted;
    let mut end = start.split_off(start_count);
    let middle = end.split_off(end_count);

    start.extend(middle);
    start.extend(end);
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn scored(id: &str, priority: f64, index: usize) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(id, "text", priority),
            priority_score: priority,
            original_index: index,
        }
    }

    fn ids(chunks: &[ScoredChunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.chunk.id.as_str()).collect()
    }

    #[test]
    fn test_interleave_reference_example() {
        // Ranks by priority desc: 1(.95), 3(.85), 5(.78), 2(.72), 4(.60).
        // Alternating placement puts rank 0 first and rank 1 last.
        let chunks = vec![
            scored("1", 0.95, 0),
            scored("2", 0.72, 1),
            scored("3", 0.85, 2),
            scored("4", 0.60, 3),
            scored("5", 0.78, 4),
        ];
        let out = score_spread(chunks, None, None);
        assert_eq!(ids(&out), vec!["1", "5", "4", "2", "3"]);
    }

    #[test]
    fn test_interleave_even_ranks_front_odd_ranks_back() {
        let chunks: Vec<ScoredChunk> = (0..6)
            .map(|i| scored(&format!("r{i}"), 1.0 - i as f64 * 0.1, i))
            .collect();
        let out = score_spread(chunks, None, None);
        assert_eq!(ids(&out), vec!["r0", "r2", "r4", "r5", "r3", "r1"]);
    }

    #[test]
    fn test_priority_tie_broken_by_original_index() {
        let chunks = vec![scored("b", 0.5, 1), scored("a", 0.5, 0), scored("c", 0.5, 2)];
        let out = score_spread(chunks, None, None);
        // Ranks: a, b, c (all tied, input order). Interleave: a front, b back, c front.
        assert_eq!(ids(&out), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_with_counts_places_start_and_end() {
        let chunks: Vec<ScoredChunk> = (0..7)
            .map(|i| scored(&format!("r{i}"), 1.0 - i as f64 * 0.1, i))
            .collect();
        let out = score_spread(chunks, Some(2), Some(2));
        // Top 2 at the front, next 2 at the back, rest (rank order) between.
        assert_eq!(ids(&out), vec!["r0", "r1", "r4", "r5", "r6", "r2", "r3"]);
    }

    #[test]
    fn test_with_counts_falls_back_to_interleave_when_exhaustive() {
        let chunks = vec![scored("a", 0.9, 0), scored("b", 0.5, 1), scored("c", 0.1, 2)];
        let counted = score_spread(chunks.clone(), Some(2), Some(1));
        let interleaved = score_spread(chunks, None, None);
        assert_eq!(ids(&counted), ids(&interleaved));
    }

    #[test]
    fn test_only_one_count_uses_interleave() {
        let chunks = vec![scored("a", 0.9, 0), scored("b", 0.5, 1), scored("c", 0.1, 2)];
        let out = score_spread(chunks, Some(1), None);
        assert_eq!(ids(&out), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_zero_counts() {
        let chunks = vec![scored("a", 0.9, 0), scored("b", 0.5, 1), scored("c", 0.1, 2)];
        let out = score_spread(chunks, Some(0), Some(0));
        // 0 + 0 < 3: everything is "middle", in rank order.
        assert_eq!(ids(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(score_spread(Vec::new(), None, None).is_empty());
        let out = score_spread(vec![scored("only", 0.5, 0)], None, None);
        assert_eq!(ids(&out), vec!["only"]);
    }
}
