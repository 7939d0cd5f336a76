//! Chronological strategy: timestamp-ascending order.

use std::cmp::Ordering;

use crate::types::ScoredChunk;

/// Sort chunks by `timestamp` ascending; chunks without a timestamp go
/// after all timestamped chunks, keeping their relative input order.
///
/// Ties among equal timestamps break by the raw retrieval `score`
/// descending rather than the weighted priority, since the priority
/// already folds in time weighting — the primary key here. Final
/// tie-breaker is `original_index`.
pub fn chronological(mut chunks: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    chunks.sort_by(|a, b| {
        let ts_a = a.chunk.metadata.as_ref().and_then(|m| m.timestamp);
        let ts_b = b.chunk.metadata.as_ref().and_then(|m| m.timestamp);

        match (ts_a, ts_b) {
            (None, None) => a.original_index.cmp(&b.original_index),
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(ta), Some(tb)) => ta
                .partial_cmp(&tb)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.chunk
                        .score
                        .partial_cmp(&a.chunk.score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.original_index.cmp(&b.original_index)),
        }
    });
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkMetadata};

    fn scored(id: &str, timestamp: Option<f64>, score: f64, index: usize) -> ScoredChunk {
        let mut chunk = Chunk::new(id, "text", score);
        if timestamp.is_some() {
            chunk = chunk.with_metadata(ChunkMetadata {
                timestamp,
                ..Default::default()
            });
        }
        ScoredChunk {
            chunk,
            priority_score: score,
            original_index: index,
        }
    }

    fn ids(chunks: &[ScoredChunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.chunk.id.as_str()).collect()
    }

    #[test]
    fn test_timestamps_ascending() {
        let chunks = vec![
            scored("c", Some(300.0), 0.5, 0),
            scored("a", Some(100.0), 0.5, 1),
            scored("b", Some(200.0), 0.5, 2),
        ];
        let out = chronological(chunks);
        assert_eq!(ids(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_timestamps_go_last_in_input_order() {
        let chunks = vec![
            scored("no2", None, 0.9, 0),
            scored("ts", Some(50.0), 0.1, 1),
            scored("no1", None, 0.8, 2),
        ];
        let out = chronological(chunks);
        assert_eq!(ids(&out), vec!["ts", "no2", "no1"]);
    }

    #[test]
    fn test_equal_timestamps_break_by_raw_score_desc() {
        let chunks = vec![
            scored("lo", Some(100.0), 0.2, 0),
            scored("hi", Some(100.0), 0.9, 1),
        ];
        let out = chronological(chunks);
        assert_eq!(ids(&out), vec!["hi", "lo"]);
    }

    #[test]
    fn test_full_tie_breaks_by_original_index() {
        let chunks = vec![
            scored("second", Some(100.0), 0.5, 1),
            scored("first", Some(100.0), 0.5, 0),
        ];
        let out = chronological(chunks);
        assert_eq!(ids(&out), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(chronological(Vec::new()).is_empty());
    }
}
