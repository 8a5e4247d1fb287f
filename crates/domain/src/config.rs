//! Configuration management

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_KEY_ENV, DEFAULT_BASE_BACKOFF_MS, DEFAULT_BASE_URL, DEFAULT_CHUNK_SIZE, DEFAULT_LANG,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_CHARACTERS_PER_CHUNK, DEFAULT_RECIPE, DEFAULT_TIMEOUT_SECS,
};
use crate::errors::{ChonkieError, Result};
use crate::types::Tokenizer;

/// Recursive chunker client configuration
///
/// Every field has a default so partial JSON/TOML files deserialize. Sizes
/// are signed so out-of-range values reach [`ChunkerConfig::validate`]
/// instead of failing to parse.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    pub tokenizer: Tokenizer,
    pub chunk_size: i64,
    pub min_characters_per_chunk: i64,
    pub recipe: String,
    pub lang: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    /// Per-request timeout in seconds; fractions are honoured
    pub timeout_secs: f64,
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_characters_per_chunk: DEFAULT_MIN_CHARACTERS_PER_CHUNK,
            recipe: DEFAULT_RECIPE.to_string(),
            lang: DEFAULT_LANG.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
        }
    }
}

impl ChunkerConfig {
    /// Check the size constraints and transport settings.
    ///
    /// The credential is checked separately by [`resolve_api_key`], since it
    /// may come from the environment.
    ///
    /// # Errors
    /// Returns `ChonkieError::Configuration` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size <= 0 {
            return Err(ChonkieError::Configuration(format!(
                "invalid chunk_size: must be greater than 0 (got {})",
                self.chunk_size
            )));
        }
        if self.min_characters_per_chunk < 1 {
            return Err(ChonkieError::Configuration(format!(
                "invalid min_characters_per_chunk: must be at least 1 (got {})",
                self.min_characters_per_chunk
            )));
        }
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
            return Err(ChonkieError::Configuration(format!(
                "invalid timeout_secs: must be a positive number of seconds (got {})",
                self.timeout_secs
            )));
        }
        if self.tokenizer.is_custom() {
            return Err(ChonkieError::Configuration(format!(
                "custom token counter '{}' cannot be evaluated by the remote service; \
                 use a named tokenizer",
                self.tokenizer.name()
            )));
        }
        Ok(())
    }

    /// Timeout as a `Duration`; out-of-range values saturate.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }
}

impl fmt::Debug for ChunkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkerConfig")
            .field("tokenizer", &self.tokenizer)
            .field("chunk_size", &self.chunk_size)
            .field("min_characters_per_chunk", &self.min_characters_per_chunk)
            .field("recipe", &self.recipe)
            .field("lang", &self.lang)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("base_backoff_ms", &self.base_backoff_ms)
            .finish()
    }
}

/// Pick the API key: an explicit non-empty key wins, otherwise
/// `CHONKIE_API_KEY` as returned by `lookup`. Keys are used verbatim.
///
/// # Errors
/// Returns `ChonkieError::Configuration` when neither source yields a
/// non-empty value.
pub fn resolve_api_key<F>(explicit: Option<&str>, lookup: F) -> Result<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(key) = explicit.filter(|key| !key.is_empty()) {
        return Ok(key.to_string());
    }

    lookup(API_KEY_ENV)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ChonkieError::Configuration(format!(
                "missing credential: set the {API_KEY_ENV} environment variable or pass an API key"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenCounter;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_match_service_defaults() {
        let config = ChunkerConfig::default();
        assert_eq!(config.tokenizer.name(), "gpt2");
        assert_eq!(config.chunk_size, 512);
        assert_eq!(config.min_characters_per_chunk, 12);
        assert_eq!(config.recipe, "default");
        assert_eq!(config.lang, "en");
        assert_eq!(config.base_url, "https://api.chonkie.ai");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_chunk_size() {
        for chunk_size in [0, -1, -512] {
            let config = ChunkerConfig { chunk_size, ..ChunkerConfig::default() };
            match config.validate() {
                Err(ChonkieError::Configuration(msg)) => assert!(msg.contains("chunk_size")),
                other => panic!("expected configuration error, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_zero_min_characters() {
        let config = ChunkerConfig { min_characters_per_chunk: 0, ..ChunkerConfig::default() };
        match config.validate() {
            Err(ChonkieError::Configuration(msg)) => {
                assert!(msg.contains("min_characters_per_chunk"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_custom_counter() {
        struct Chars;
        impl TokenCounter for Chars {
            fn name(&self) -> &str {
                "chars"
            }
            fn count_tokens(&self, text: &str) -> usize {
                text.chars().count()
            }
        }

        let config = ChunkerConfig { tokenizer: Tokenizer::custom(Chars), ..Default::default() };
        assert!(matches!(config.validate(), Err(ChonkieError::Configuration(_))));
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let key = resolve_api_key(Some("explicit"), |_| Some("from-env".into())).expect("key");
        assert_eq!(key, "explicit");
    }

    #[test]
    fn falls_back_to_environment() {
        let key = resolve_api_key(None, |name| {
            assert_eq!(name, "CHONKIE_API_KEY");
            Some("from-env".into())
        })
        .expect("key");
        assert_eq!(key, "from-env");
    }

    #[test]
    fn empty_sources_are_missing_credentials() {
        for explicit in [None, Some("")] {
            let result = resolve_api_key(explicit, |_| Some(String::new()));
            assert!(matches!(result, Err(ChonkieError::Configuration(_))));
            assert!(matches!(resolve_api_key(explicit, no_env), Err(ChonkieError::Configuration(_))));
        }
    }

    #[test]
    fn keys_are_passed_through_verbatim() {
        assert_eq!(resolve_api_key(Some(" abc "), no_env).expect("key"), " abc ");
        assert_eq!(resolve_api_key(Some("   "), no_env).expect("key"), "   ");
        assert_eq!(resolve_api_key(None, |_| Some(" env ".into())).expect("key"), " env ");
    }

    #[test]
    fn timeout_must_be_positive_and_finite() {
        for timeout_secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = ChunkerConfig { timeout_secs, ..ChunkerConfig::default() };
            match config.validate() {
                Err(ChonkieError::Configuration(msg)) => assert!(msg.contains("timeout_secs")),
                other => panic!("timeout {timeout_secs}: expected configuration error, got {other:?}"),
            }
        }
    }

    #[test]
    fn sub_second_timeout_is_kept() {
        let config = ChunkerConfig { timeout_secs: 0.25, ..ChunkerConfig::default() };
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config =
            ChunkerConfig { api_key: Some("sk-secret".to_string()), ..ChunkerConfig::default() };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ChunkerConfig =
            serde_json::from_str(r#"{ "chunk_size": 256, "lang": "de" }"#).expect("deserialize");
        assert_eq!(config.chunk_size, 256);
        assert_eq!(config.lang, "de");
        assert_eq!(config.recipe, "default");
    }
}
