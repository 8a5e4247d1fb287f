/// Recursive chunking client for the Chonkie cloud API
use std::fmt;
use std::time::Duration;

use chonkie_domain::constants::{API_VERSION, RECURSIVE_CHUNK_PATH};
use chonkie_domain::{resolve_api_key, ChonkieError, ChunkerConfig, RecursiveChunk, Result, Tokenizer};
use reqwest::blocking::Response;
use reqwest::{Method, StatusCode, Url};
use serde::de::{DeserializeOwned, Error as _};
use tracing::{debug, info, instrument, warn};

use super::types::{ChunkInput, ChunkOutput, ChunkText, RecursiveChunkRequest};
use crate::errors::conversions::status_error;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Blocking client for `POST /v1/chunk/recursive`.
///
/// Built in two phases: [`RecursiveChunkerBuilder::build`] validates the
/// configuration without touching the network, and [`Self::verify`] probes
/// the service root. [`RecursiveChunkerBuilder::connect`] does both.
///
/// # Panics
/// The HTTP transport is `reqwest::blocking`. Calling [`Self::verify`] or a
/// chunk method from inside an async runtime panics, and so does dropping a
/// client that has made a request there. Run it on `spawn_blocking` instead.
pub struct RecursiveChunkerClient {
    http_client: HttpClient,
    api_key: String,
    config: ChunkerConfig,
    health_url: Url,
    chunk_url: Url,
}

impl RecursiveChunkerClient {
    /// Create a builder with default configuration
    pub fn builder() -> RecursiveChunkerBuilder {
        RecursiveChunkerBuilder::default()
    }

    /// Create a builder seeded from a loaded configuration
    pub fn from_config(config: ChunkerConfig) -> RecursiveChunkerBuilder {
        RecursiveChunkerBuilder { config }
    }

    /// Effective configuration, with the resolved API key
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// URL of the recursive chunking endpoint
    pub fn endpoint(&self) -> &str {
        self.chunk_url.as_str()
    }

    /// Probe the service root.
    ///
    /// # Errors
    /// Returns `ChonkieError::ServiceUnavailable` unless the service answers
    /// exactly 200, or `ChonkieError::Network` when it cannot be reached.
    #[instrument(skip(self), fields(url = %self.health_url))]
    pub fn verify(&self) -> Result<()> {
        let request = self.http_client.request(Method::GET, self.health_url.clone())?;
        let response = self.http_client.send(request)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Chonkie liveness check failed");
            return Err(ChonkieError::ServiceUnavailable { status: status.as_u16() });
        }

        debug!("Chonkie service is reachable");
        Ok(())
    }

    /// Chunk one text.
    ///
    /// # Errors
    /// Returns `ChonkieError::ServiceResponse` when the body is not a JSON
    /// array of chunk records, `Authentication`/`Api` for non-success
    /// statuses and `Network` for transport failures.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub fn chunk_one(&self, text: &str) -> Result<Vec<RecursiveChunk>> {
        let chunks: Vec<RecursiveChunk> = self.post_chunks(ChunkText::Single(text))?;

        info!(mode = "single", chunk_count = chunks.len(), "Chunked text with Chonkie");
        Ok(chunks)
    }

    /// Chunk several texts in one request; `result[i]` belongs to `texts[i]`.
    ///
    /// # Errors
    /// Same as [`Self::chunk_one`]. A response with a different number of
    /// chunk lists than texts is also a `ServiceResponse` error.
    #[instrument(skip(self, texts), fields(texts = texts.len()))]
    pub fn chunk_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<RecursiveChunk>>> {
        let batch: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
        let chunks: Vec<Vec<RecursiveChunk>> = self.post_chunks(ChunkText::Batch(batch))?;

        if chunks.len() != texts.len() {
            warn!(expected = texts.len(), received = chunks.len(), "Batch size mismatch");
            return Err(ChonkieError::invalid_response(
                "batch size mismatch",
                serde_json::Error::custom(format!(
                    "expected {} chunk lists, received {}",
                    texts.len(),
                    chunks.len()
                )),
            ));
        }

        info!(
            mode = "batch",
            texts = texts.len(),
            chunk_count = chunks.iter().map(Vec::len).sum::<usize>(),
            "Chunked batch with Chonkie"
        );
        Ok(chunks)
    }

    /// Chunk a single text or a batch; the output has the input's shape.
    ///
    /// # Errors
    /// See [`Self::chunk_one`] and [`Self::chunk_many`].
    pub fn chunk(&self, input: impl Into<ChunkInput>) -> Result<ChunkOutput> {
        match input.into() {
            ChunkInput::Single(text) => self.chunk_one(&text).map(ChunkOutput::Single),
            ChunkInput::Batch(texts) => self.chunk_many(&texts).map(ChunkOutput::Batch),
        }
    }

    /// Shorthand for [`Self::chunk`].
    ///
    /// # Errors
    /// See [`Self::chunk`].
    pub fn call(&self, input: impl Into<ChunkInput>) -> Result<ChunkOutput> {
        self.chunk(input)
    }

    /// Send one chunk request and decode the body as `T`
    fn post_chunks<T: DeserializeOwned>(&self, text: ChunkText<'_>) -> Result<T> {
        let payload = RecursiveChunkRequest {
            text,
            tokenizer_or_token_counter: self.config.tokenizer.name(),
            chunk_size: self.config.chunk_size,
            min_characters_per_chunk: self.config.min_characters_per_chunk,
            recipe: &self.config.recipe,
            lang: &self.config.lang,
        };

        let request_builder = self
            .http_client
            .request(Method::POST, self.chunk_url.clone())?
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload);

        let response = self.http_client.send(request_builder)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received Chonkie API response");

        if !status.is_success() {
            let error = Self::handle_error_status(status, response);
            warn!(status = status.as_u16(), error = error.label(), "Chonkie rejected request");
            return Err(error);
        }

        let body = response.bytes().map_err(|err| ChonkieError::from(InfraError::from(err)))?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!(error = %err, body_len = body.len(), "Chonkie returned an undecodable body");
            ChonkieError::from(InfraError::from(err))
        })
    }

    /// Handle HTTP error status codes
    fn handle_error_status(status: StatusCode, response: Response) -> ChonkieError {
        let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
        status_error(status, message)
    }
}

impl fmt::Debug for RecursiveChunkerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveChunkerClient")
            .field("config", &self.config)
            .field("chunk_url", &self.chunk_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RecursiveChunkerClient`]
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunkerBuilder {
    config: ChunkerConfig,
}

impl RecursiveChunkerBuilder {
    pub fn tokenizer(mut self, tokenizer: impl Into<Tokenizer>) -> Self {
        self.config.tokenizer = tokenizer.into();
        self
    }

    pub fn chunk_size(mut self, chunk_size: i64) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    pub fn min_characters_per_chunk(mut self, min_characters: i64) -> Self {
        self.config.min_characters_per_chunk = min_characters;
        self
    }

    pub fn recipe(mut self, recipe: impl Into<String>) -> Self {
        self.config.recipe = recipe.into();
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.config.lang = lang.into();
        self
    }

    /// Explicit API key; takes precedence over `CHONKIE_API_KEY`
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Service root, e.g. a mock server in tests
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Per-request timeout; zero is rejected by [`Self::build`]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Total attempts per request (initial try + retries)
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.config.base_backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// Nothing is started here: no request is sent and no transport thread
    /// is spawned until the first call. The fallback credential is read from
    /// the process environment.
    ///
    /// # Errors
    /// Returns `ChonkieError::Configuration` for a missing credential, invalid
    /// sizes, a malformed base URL or a custom token counter.
    pub fn build(self) -> Result<RecursiveChunkerClient> {
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Like [`Self::build`], resolving the fallback credential through
    /// `lookup` instead of the process environment.
    ///
    /// # Errors
    /// See [`Self::build`].
    pub fn build_with<F>(self, lookup: F) -> Result<RecursiveChunkerClient>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let mut config = self.config;

        let api_key = resolve_api_key(config.api_key.as_deref(), lookup)?;
        config.validate()?;

        let (health_url, chunk_url) = service_urls(&config.base_url)?;

        let http_client = HttpClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .base_backoff(config.base_backoff())
            .user_agent(concat!("chonkie-rs/", env!("CARGO_PKG_VERSION")))
            .build();

        config.api_key = Some(api_key.clone());

        debug!(endpoint = %chunk_url, recipe = %config.recipe, lang = %config.lang, "Built Chonkie client");

        Ok(RecursiveChunkerClient { http_client, api_key, config, health_url, chunk_url })
    }

    /// Build the client and probe the service, like the eager constructor of
    /// the hosted SDKs.
    ///
    /// # Errors
    /// Any error of [`Self::build`] or [`RecursiveChunkerClient::verify`].
    ///
    /// # Panics
    /// When called from inside an async runtime; see
    /// [`RecursiveChunkerClient`].
    pub fn connect(self) -> Result<RecursiveChunkerClient> {
        let client = self.build()?;
        client.verify()?;
        Ok(client)
    }
}

/// Liveness and chunk URLs derived from the configured service root
fn service_urls(base_url: &str) -> Result<(Url, Url)> {
    let base = base_url.trim().trim_end_matches('/');

    let invalid = |reason: String| {
        ChonkieError::Configuration(format!("invalid base_url '{base_url}': {reason}"))
    };

    let health_url = Url::parse(&format!("{base}/")).map_err(|err| invalid(err.to_string()))?;
    if !matches!(health_url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", health_url.scheme())));
    }

    let chunk_url = Url::parse(&format!("{base}/{API_VERSION}/{RECURSIVE_CHUNK_PATH}"))
        .map_err(|err| invalid(err.to_string()))?;

    Ok((health_url, chunk_url))
}
