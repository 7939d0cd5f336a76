//! Tiktoken-backed token counting for the output token budget.
//!
//! The budget stage (pipeline step 8) only ever asks "how many tokens is
//! this chunk's text", so this module exposes exactly that: a [`Tokenizer`]
//! holding a [`CoreBPE`] encoder, handed to the pipeline through
//! [`Tokenizer::counter`]:
//!
//! ```ignore
//! use context_reorder::{ReorderConfig, Tokenizer};
//!
//! let config = ReorderConfig::default()
//!     .with_max_tokens(2048)
//!     .with_token_counter(Tokenizer::for_model("gpt-4o").counter());
//! ```
//!
//! Only two encodings matter for sizing a budget: o200k (gpt-4o and the
//! o-series) and cl100k (everything else). Callers targeting a model with
//! a different tokenizer can supply any closure instead; the budget stage
//! accepts whatever satisfies [`TokenCounter`].

use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

use crate::traits::TokenCounter;

/// Token counter sized to a target model's encoding.
pub struct Tokenizer {
    encoder: CoreBPE,
    model: String,
}

impl Tokenizer {
    /// Create a tokenizer for the model whose context window the budget
    /// is sized against.
    ///
    /// gpt-4o and o-series model names select the o200k encoding; every
    /// other name, known or not, falls back to cl100k_base.
    pub fn for_model(model: &str) -> Self {
        let encoder = if model.contains("gpt-4o") || model.contains("o1") || model.contains("o3")
        {
            o200k_base().expect("failed to load o200k encoding")
        } else {
            cl100k_base().expect("failed to load cl100k encoding")
        };

        Self {
            encoder,
            model: model.to_string(),
        }
    }

    /// Count the tokens in a chunk's text.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.encoder.encode_with_special_tokens(text).len()
    }

    /// Consume the tokenizer into a [`TokenCounter`] suitable for
    /// `with_token_counter`.
    pub fn counter(self) -> impl TokenCounter {
        move |text: &str| self.encoder.encode_with_special_tokens(text).len()
    }

    /// The model name this tokenizer was selected for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for Tokenizer {
    /// cl100k_base, the fallback encoding.
    fn default() -> Self {
        Self::for_model("cl100k_base")
    }
}
