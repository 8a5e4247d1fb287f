//! Chunk records returned by the recursive chunking endpoint

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A contiguous span of submitted text, as produced by the remote recursive
/// chunker.
///
/// Offsets are character offsets into the submitted text. Fields the service
/// adds beyond these are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveChunk {
    /// Chunk content
    pub text: String,
    /// Start offset (inclusive)
    pub start_index: usize,
    /// End offset (exclusive)
    pub end_index: usize,
    /// Token count, measured with the tokenizer named in the request
    pub token_count: usize,
    /// Recursion level at which the split happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

impl RecursiveChunk {
    pub fn new(
        text: impl Into<String>,
        start_index: usize,
        end_index: usize,
        token_count: usize,
    ) -> Self {
        Self { text: text.into(), start_index, end_index, token_count, level: None }
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = Some(level);
        self
    }

    /// Decode a single record from an already-parsed JSON value.
    ///
    /// # Errors
    /// Returns the `serde_json` error when required fields are missing or have
    /// the wrong type.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Span length in characters, as reported by the offsets.
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RecursiveChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
