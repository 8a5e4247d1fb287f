//! # Chonkie Infrastructure
//!
//! Impure side of the Chonkie cloud client.
//!
//! This crate contains:
//! - Blocking HTTP client with retry and timeout policy
//! - Conversions from transport/decoding errors into `ChonkieError`
//! - Configuration loading from `.env`, environment variables and files
//! - The recursive chunking integration (`RecursiveChunkerClient`)
//!
//! ## Architecture
//! - Depends on `chonkie-domain` for types and errors
//! - Contains all I/O (HTTP, environment, filesystem)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::chonkie::{
    ChunkInput, ChunkOutput, RecursiveChunkerBuilder, RecursiveChunkerClient,
};
