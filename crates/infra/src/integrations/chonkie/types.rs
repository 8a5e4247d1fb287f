/// Request/response types for the recursive chunking endpoint
use chonkie_domain::RecursiveChunk;
use serde::Serialize;

/// Text submitted to [`RecursiveChunkerClient::chunk`](super::RecursiveChunkerClient::chunk)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkInput {
    /// One document; the service answers with one list of chunks
    Single(String),
    /// Several documents; the service answers with one list per document
    Batch(Vec<String>),
}

impl ChunkInput {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

impl From<&str> for ChunkInput {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for ChunkInput {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl From<Vec<String>> for ChunkInput {
    fn from(texts: Vec<String>) -> Self {
        Self::Batch(texts)
    }
}

impl From<Vec<&str>> for ChunkInput {
    fn from(texts: Vec<&str>) -> Self {
        Self::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ChunkInput {
    fn from(texts: &[&str]) -> Self {
        Self::Batch(texts.iter().map(|text| (*text).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ChunkInput {
    fn from(texts: [&str; N]) -> Self {
        Self::Batch(texts.iter().map(|text| (*text).to_string()).collect())
    }
}

/// Parsed chunks, shaped like the [`ChunkInput`] that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutput {
    Single(Vec<RecursiveChunk>),
    /// `batch[i]` holds the chunks of input text `i`
    Batch(Vec<Vec<RecursiveChunk>>),
}

impl ChunkOutput {
    /// Chunks of a single-text call, `None` for batch output
    pub fn into_single(self) -> Option<Vec<RecursiveChunk>> {
        match self {
            Self::Single(chunks) => Some(chunks),
            Self::Batch(_) => None,
        }
    }

    /// Per-text chunk lists of a batch call, `None` for single output
    pub fn into_batch(self) -> Option<Vec<Vec<RecursiveChunk>>> {
        match self {
            Self::Single(_) => None,
            Self::Batch(batch) => Some(batch),
        }
    }

    /// Total number of chunks across all texts
    pub fn chunk_count(&self) -> usize {
        match self {
            Self::Single(chunks) => chunks.len(),
            Self::Batch(batch) => batch.iter().map(Vec::len).sum(),
        }
    }
}

/// `text` field of the request body: a JSON string or an array of strings
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ChunkText<'a> {
    Single(&'a str),
    Batch(Vec<&'a str>),
}

/// JSON body of `POST /v1/chunk/recursive`
#[derive(Debug, Serialize)]
pub(crate) struct RecursiveChunkRequest<'a> {
    pub text: ChunkText<'a>,
    pub tokenizer_or_token_counter: &'a str,
    pub chunk_size: i64,
    pub min_characters_per_chunk: i64,
    pub recipe: &'a str,
    pub lang: &'a str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(text: ChunkText<'_>) -> RecursiveChunkRequest<'_> {
        RecursiveChunkRequest {
            text,
            tokenizer_or_token_counter: "gpt2",
            chunk_size: 512,
            min_characters_per_chunk: 12,
            recipe: "default",
            lang: "en",
        }
    }

    #[test]
    fn single_text_serializes_as_string() {
        let value = serde_json::to_value(request(ChunkText::Single("Hello world"))).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "Hello world",
                "tokenizer_or_token_counter": "gpt2",
                "chunk_size": 512,
                "min_characters_per_chunk": 12,
                "recipe": "default",
                "lang": "en"
            })
        );
    }

    #[test]
    fn batch_serializes_as_array_in_order() {
        let value = serde_json::to_value(request(ChunkText::Batch(vec!["b", "a", ""]))).unwrap();
        assert_eq!(value["text"], json!(["b", "a", ""]));
    }

    #[test]
    fn input_conversions_pick_the_right_mode() {
        assert!(!ChunkInput::from("one").is_batch());
        assert!(!ChunkInput::from(String::from("one")).is_batch());
        assert!(ChunkInput::from(vec!["a", "b"]).is_batch());
        assert!(ChunkInput::from(["a", "b"]).is_batch());
        assert_eq!(ChunkInput::from(&["x"][..]), ChunkInput::Batch(vec!["x".to_string()]));
    }

    #[test]
    fn output_accessors_match_shape() {
        let chunk = RecursiveChunk::new("a", 0, 1, 1);
        let batch = ChunkOutput::Batch(vec![vec![chunk.clone()], vec![chunk.clone(), chunk]]);

        assert_eq!(batch.chunk_count(), 3);
        assert!(batch.clone().into_single().is_none());
        assert_eq!(batch.into_batch().map(|b| b.len()), Some(2));
    }
}
