//! JSON (de)serialization boundary for chunk lists.
//!
//! Chunk lists travel as a plain JSON array. Deserialization re-validates
//! the same structural constraints as pipeline validation (non-empty id,
//! finite score) and fails the whole operation on the first invalid
//! element or a non-array top-level value.

use crate::error::{ReorderError, Result};
use crate::types::Chunk;

/// Serialize chunks to a JSON array string.
pub fn serialize_chunks(chunks: &[Chunk]) -> Result<String> {
    Ok(serde_json::to_string(chunks)?)
}

/// Deserialize a JSON array into chunks, validating each element.
pub fn deserialize_chunks(json: &str) -> Result<Vec<Chunk>> {
    let parsed: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ReorderError::Validation(format!("Failed to parse JSON: {e}")))?;

    let items = parsed.as_array().ok_or_else(|| {
        ReorderError::Validation("Failed to parse JSON: expected an array".to_string())
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let chunk: Chunk = serde_json::from_value(item.clone()).map_err(|e| {
                ReorderError::Validation(format!(
                    "Deserialized chunk at index {index} is invalid: {e}"
                ))
            })?;
            if chunk.id.is_empty() {
                return Err(ReorderError::Validation(format!(
                    "Deserialized chunk at index {index} is missing or has an empty 'id'"
                )));
            }
            if !chunk.score.is_finite() {
                return Err(ReorderError::Validation(format!(
                    "Deserialized chunk at index {index} has an invalid 'score' \
                     (must be a finite number)"
                )));
            }
            Ok(chunk)
        })
        .collect()
}
