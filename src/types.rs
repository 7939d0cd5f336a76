//! Core data types for chunk reordering.
//!
//! # Data Model
//!
//! ```ascii
//! ┌──────────────────────────────────────────────────────────┐
//! │ Chunk (public, immutable-by-contract)                    │
//! │   id: String          ─► unique within a call            │
//! │   text: String        ─► passage content (may be empty)  │
//! │   score: f64          ─► prior relevance estimate        │
//! │   metadata: Option<ChunkMetadata>                        │
//! └──────────────────────────────────────────────────────────┘
//!                           │ scoring (pipeline step 5)
//!                           ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ ScoredChunk (pipeline-internal wrapper)                  │
//! │   chunk: Chunk                                           │
//! │   priority_score: f64   ─► weighted composite            │
//! │   original_index: usize ─► universal stable tie-breaker  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! `ScoredChunk` never leaks into caller-visible output: the wrapper is
//! discarded before results are returned. The only opt-in exception is
//! `include_priority_score`, which re-surfaces the priority as the
//! `priorityScore` metadata key.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ReorderError;

/// Extensible metadata attached to a chunk.
///
/// The four well-known fields are used by built-in strategies and the
/// scorer. Arbitrary extra keys are preserved unmodified through the
/// pipeline and across (de)serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Unix timestamp or epoch ms for temporal ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    /// Page number in the source document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<f64>,

    /// Position/index within the source document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_index: Option<f64>,

    /// Identifier of the source document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    /// Unknown keys, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ChunkMetadata {
    /// Look up a field by its wire name and coerce it to a group key.
    ///
    /// Known numeric fields render without a trailing `.0` when integral,
    /// so grouping by `page: 3` and `page: 3.0` lands in the same bucket.
    /// Returns `None` when the field is absent (or JSON `null`).
    pub fn group_key(&self, field: &str) -> Option<String> {
        match field {
            "timestamp" => self.timestamp.map(format_number),
            "page" => self.page.map(format_number),
            "sectionIndex" => self.section_index.map(format_number),
            "sourceId" => self.source_id.clone(),
            _ => self.extra.get(field).and_then(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => n.as_f64().map(format_number),
                other => Some(other.to_string()),
            }),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A retrieved passage with text, relevance score, and optional metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The passage text content.
    pub text: String,
    /// Relevance score from retrieval (typically 0-1).
    pub score: f64,
    /// Optional metadata for scoring and strategy selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChunkMetadata>,
}

impl Chunk {
    /// Create a chunk without metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            score,
            metadata: None,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Pipeline-internal wrapper pairing a chunk with its computed priority
/// score and original input position.
///
/// `original_index` is a permutation of `[0, n)` per pipeline run, assigned
/// strictly by input order at scoring time, and breaks ties in every stable
/// sort in the system.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The underlying chunk.
    pub chunk: Chunk,
    /// Composite score from weighted relevance and normalized metadata.
    pub priority_score: f64,
    /// Position in the scorer's input, used for stable sorting.
    pub original_index: usize,
}

/// Weights for computing the composite priority score.
///
/// The default leaves priority equal to the raw relevance score; temporal
/// and positional weighting are opt-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight for the base relevance score.
    pub similarity: f64,
    /// Weight for the normalized timestamp.
    pub time: f64,
    /// Weight for the normalized section index.
    pub section: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 1.0,
            time: 0.0,
            section: 0.0,
        }
    }
}

/// Available reordering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Interleave by priority so the best chunks land at both edges of
    /// the context window.
    #[default]
    ScoreSpread,
    /// Keep document order within each source, most relevant source first.
    PreserveOrder,
    /// Sort by timestamp ascending, missing timestamps last.
    Chronological,
    /// Apply a caller-supplied comparator.
    Custom,
}

/// Survivor selection when duplicates are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKeep {
    /// Keep the chunk with the highest relevance score (ties: earliest).
    #[default]
    HighestScore,
    /// Keep the earliest occurrence in the input.
    First,
    /// Keep the latest occurrence in the input.
    Last,
}

/// User-supplied comparison function for the `Custom` strategy.
pub type CustomComparator = Arc<dyn Fn(&Chunk, &Chunk) -> Ordering + Send + Sync>;

/// Callback invoked when the reranker fails. The pipeline continues with
/// original scores regardless of what this handler does.
pub type RerankerErrorHandler = Arc<dyn Fn(&ReorderError) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.similarity, 1.0);
        assert_eq!(weights.time, 0.0);
        assert_eq!(weights.section, 0.0);
    }

    #[test]
    fn test_chunk_builder() {
        let chunk = Chunk::new("c1", "hello", 0.8).with_metadata(ChunkMetadata {
            source_id: Some("doc-1".to_string()),
            ..Default::default()
        });
        assert_eq!(chunk.id, "c1");
        assert_eq!(
            chunk.metadata.unwrap().source_id,
            Some("doc-1".to_string())
        );
    }

    #[test]
    fn test_group_key_known_fields() {
        let meta = ChunkMetadata {
            timestamp: Some(1700000000.0),
            page: Some(3.0),
            section_index: Some(2.5),
            source_id: Some("doc-1".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.group_key("timestamp"), Some("1700000000".to_string()));
        assert_eq!(meta.group_key("page"), Some("3".to_string()));
        assert_eq!(meta.group_key("sectionIndex"), Some("2.5".to_string()));
        assert_eq!(meta.group_key("sourceId"), Some("doc-1".to_string()));
    }

    #[test]
    fn test_group_key_extra_fields() {
        let mut meta = ChunkMetadata::default();
        meta.extra
            .insert("author".to_string(), serde_json::json!("alice"));
        meta.extra
            .insert("version".to_string(), serde_json::json!(7));
        meta.extra
            .insert("nothing".to_string(), serde_json::Value::Null);

        assert_eq!(meta.group_key("author"), Some("alice".to_string()));
        assert_eq!(meta.group_key("version"), Some("7".to_string()));
        assert_eq!(meta.group_key("nothing"), None);
        assert_eq!(meta.group_key("missing"), None);
    }

    #[test]
    fn test_group_key_extra_numbers_bucket_like_known_fields() {
        // Integer and integral-float values of a custom field must land
        // in the same bucket, exactly like the known numeric fields.
        let mut int_meta = ChunkMetadata::default();
        int_meta
            .extra
            .insert("chapter".to_string(), serde_json::json!(3));
        let mut float_meta = ChunkMetadata::default();
        float_meta
            .extra
            .insert("chapter".to_string(), serde_json::json!(3.0));

        assert_eq!(int_meta.group_key("chapter"), Some("3".to_string()));
        assert_eq!(float_meta.group_key("chapter"), Some("3".to_string()));

        let mut frac_meta = ChunkMetadata::default();
        frac_meta
            .extra
            .insert("chapter".to_string(), serde_json::json!(2.5));
        assert_eq!(frac_meta.group_key("chapter"), Some("2.5".to_string()));
    }

    #[test]
    fn test_metadata_serde_camel_case_and_extra() {
        let json = r#"{"timestamp":42,"sectionIndex":1,"sourceId":"d","custom":"x"}"#;
        let meta: ChunkMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.timestamp, Some(42.0));
        assert_eq!(meta.section_index, Some(1.0));
        assert_eq!(meta.source_id, Some("d".to_string()));
        assert_eq!(meta.extra.get("custom"), Some(&serde_json::json!("x")));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["sectionIndex"], serde_json::json!(1.0));
        assert_eq!(back["custom"], serde_json::json!("x"));
    }
}
