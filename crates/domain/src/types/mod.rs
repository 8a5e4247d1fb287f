//! Domain types and models
//!
//! Records exchanged with the chunking service and the client-side
//! description of how the service should count tokens.

pub mod chunk;
pub mod tokenizer;

pub use chunk::RecursiveChunk;
pub use tokenizer::{TokenCounter, Tokenizer};
