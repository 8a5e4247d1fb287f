//! # Chonkie Domain
//!
//! Domain types for the Chonkie cloud chunking client.
//!
//! This crate contains:
//! - Chunk records and tokenizer selection (`types`)
//! - Client configuration and credential resolution (`config`)
//! - The client error type and Result alias (`errors`)
//! - Wire-protocol constants and defaults (`constants`)
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O; HTTP lives in `chonkie-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{resolve_api_key, ChunkerConfig};
pub use errors::{ChonkieError, ErrorCategory, Result};
pub use types::{RecursiveChunk, TokenCounter, Tokenizer};
