use std::thread;
use std::time::Duration;

use chonkie_domain::constants::{DEFAULT_BASE_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use chonkie_domain::ChonkieError;
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client as ReqwestClient, RequestBuilder, Response};
use reqwest::{Method, Url};
use tracing::debug;

use crate::errors::InfraError;

/// Blocking HTTP transport with retry and timeout policy.
///
/// The underlying `reqwest` client owns a background runtime thread, so it
/// is created on the first request rather than in [`HttpClientBuilder::build`].
///
/// # Panics
/// Like any `reqwest::blocking` client, sending (or dropping a client that
/// has sent) from inside an async runtime panics. Use `spawn_blocking`.
#[derive(Debug)]
pub struct HttpClient {
    transport: OnceCell<ReqwestClient>,
    timeout: Duration,
    user_agent: Option<String>,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Request builder on the shared transport, starting it on first use.
    ///
    /// # Errors
    /// Returns `ChonkieError::Configuration` when the transport cannot be
    /// initialised (e.g. no TLS backend).
    pub fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ChonkieError> {
        Ok(self.transport()?.request(method, url))
    }

    /// Execute `builder`, retrying server errors (5xx) and connect, timeout
    /// or request failures with exponential backoff.
    ///
    /// Any other status is returned to the caller as-is, and so is the last
    /// response or error once attempts run out.
    ///
    /// # Errors
    /// `Network` for transport failures, `Internal` when the body cannot be
    /// replayed.
    pub fn send(&self, builder: RequestBuilder) -> Result<Response, ChonkieError> {
        let transport = self.transport()?;

        for attempt in 1..=self.max_attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| ChonkieError::Internal("request body cannot be replayed".into()))?
                .build()
                .map_err(|err| ChonkieError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            let last_attempt = attempt == self.max_attempts;

            match transport.execute(request) {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "HTTP response");

                    if status.is_server_error() && !last_attempt {
                        self.pause(attempt);
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if is_transient(&err) && !last_attempt {
                        self.pause(attempt);
                        continue;
                    }
                    return Err(ChonkieError::from(InfraError::from(err)));
                }
            }
        }

        Err(ChonkieError::Internal("retry loop ended without a response".into()))
    }

    fn transport(&self) -> Result<&ReqwestClient, ChonkieError> {
        self.transport.get_or_try_init(|| {
            let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
            if let Some(agent) = &self.user_agent {
                builder = builder.user_agent(agent.as_str());
            }
            builder.build().map_err(|err| ChonkieError::from(InfraError::from(err)))
        })
    }

    /// Delay before retry `retry`: base, 2x base, 4x base, ... capped at 256x.
    fn backoff_delay(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1 << shift)
    }

    fn pause(&self, retry: usize) {
        let delay = self.backoff_delay(retry);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    #[cfg(test)]
    pub(crate) fn transport_started(&self) -> bool {
        self.transport.get().is_some()
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per request (initial try + retries), at least 1.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Capture the settings. Nothing is started until the first request.
    pub fn build(self) -> HttpClient {
        HttpClient {
            transport: OnceCell::new(),
            timeout: self.timeout,
            user_agent: self.user_agent,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
