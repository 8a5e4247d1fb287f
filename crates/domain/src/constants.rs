//! Client constants
//!
//! Centralized location for wire-protocol constants and configuration
//! defaults.

// Service endpoints
pub const DEFAULT_BASE_URL: &str = "https://api.chonkie.ai";
pub const API_VERSION: &str = "v1";
pub const RECURSIVE_CHUNK_PATH: &str = "chunk/recursive";

// Credentials
pub const API_KEY_ENV: &str = "CHONKIE_API_KEY";

// Chunking defaults
pub const DEFAULT_TOKENIZER: &str = "gpt2";
pub const DEFAULT_CHUNK_SIZE: i64 = 512;
pub const DEFAULT_MIN_CHARACTERS_PER_CHUNK: i64 = 12;
pub const DEFAULT_RECIPE: &str = "default";
pub const DEFAULT_LANG: &str = "en";

// Transport policy
pub const DEFAULT_TIMEOUT_SECS: f64 = 60.0;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 200;
