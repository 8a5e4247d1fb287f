//! Tokenizer selection sent to the chunking service

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::DEFAULT_TOKENIZER;

/// A local token counter.
///
/// The service measures chunk size itself, so a local counter can only be
/// described to it by name. Clients reject [`Tokenizer::Custom`] at build time.
pub trait TokenCounter: Send + Sync {
    /// Identifier of the counter
    fn name(&self) -> &str;

    /// Count tokens in `text`
    fn count_tokens(&self, text: &str) -> usize;
}

/// How the service should measure chunk size.
#[derive(Clone)]
pub enum Tokenizer {
    /// A tokenizer known to the service, e.g. `"gpt2"` or `"character"`
    Named(String),
    /// A caller-provided counter; it never runs server-side
    Custom(Arc<dyn TokenCounter>),
}

impl Tokenizer {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn custom(counter: impl TokenCounter + 'static) -> Self {
        Self::Custom(Arc::new(counter))
    }

    /// Identifier placed in the `tokenizer_or_token_counter` request field
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Custom(counter) => counter.name(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::Named(DEFAULT_TOKENIZER.to_string())
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(counter) => f.debug_tuple("Custom").field(&counter.name()).finish(),
        }
    }
}

impl From<&str> for Tokenizer {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for Tokenizer {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl Serialize for Tokenizer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Tokenizer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Named)
    }
}
