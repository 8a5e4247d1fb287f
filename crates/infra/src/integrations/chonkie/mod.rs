/// Chonkie cloud integration for recursive chunking
///
/// This module provides a blocking client for the hosted Chonkie API. The
/// splitting itself happens server-side; the client validates configuration,
/// probes the service, posts text and decodes the returned chunk records.
///
/// # Architecture
///
/// - **Client**: `RecursiveChunkerClient` - two-phase (`build` then `verify`)
///   wrapper around `POST /v1/chunk/recursive`
/// - **Types**: `ChunkInput`/`ChunkOutput` for single and batch calls
/// - **Transport**: `HttpClient` with timeout, retry and backoff, started
///   lazily on the first request so `build` stays free of I/O and threads
///
/// # Panics
///
/// The transport is `reqwest::blocking`: `verify`, `connect` and the chunk
/// methods panic when called from inside an async runtime. Building or
/// dropping an unused client there is fine.
///
/// # Usage
///
/// ```no_run
/// use chonkie_infra::integrations::chonkie::RecursiveChunkerClient;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // API key falls back to CHONKIE_API_KEY
/// let client = RecursiveChunkerClient::builder()
///     .chunk_size(256)
///     .recipe("markdown")
///     .connect()?;
///
/// let chunks = client.chunk_one("# Title\n\nSome text to split.")?;
/// for chunk in &chunks {
///     println!("[{}..{}] {} tokens", chunk.start_index, chunk.end_index, chunk.token_count);
/// }
///
/// let batch = client.chunk_many(&["first document", "second document"])?;
/// assert_eq!(batch.len(), 2);
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// - **Liveness failure**: `ServiceUnavailable` from `verify`/`connect`
/// - **Server errors (5xx) and network errors**: retried by `HttpClient`, then
///   surfaced as `Api`/`Network`
/// - **Client errors (4xx)**: not retried; 401/403 become `Authentication`
/// - **Undecodable bodies**: always `ServiceResponse`, with the decode error
///   as `source()`
pub mod client;
pub mod types;

pub use client::{RecursiveChunkerBuilder, RecursiveChunkerClient};
pub use types::{ChunkInput, ChunkOutput};
