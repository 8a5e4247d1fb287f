//! Configuration loader
//!
//! Loads the chunker configuration from files, `.env` and environment
//! variables.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory, if present
//! 2. Probes the standard paths for a config file (JSON or TOML)
//! 3. Falls back to built-in defaults when no file exists
//! 4. Applies environment variable overrides on top
//!
//! ## Environment Variables
//! - `CHONKIE_API_KEY`: API key
//! - `CHONKIE_BASE_URL`: Service root
//! - `CHONKIE_TOKENIZER`: Tokenizer name understood by the service
//! - `CHONKIE_CHUNK_SIZE`: Target chunk size in tokens
//! - `CHONKIE_MIN_CHARACTERS_PER_CHUNK`: Minimum characters per chunk
//! - `CHONKIE_RECIPE`: Recipe name
//! - `CHONKIE_LANG`: Recipe language
//! - `CHONKIE_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `CHONKIE_MAX_ATTEMPTS`: Attempts per request, including the first
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./chonkie.toml`, `./chonkie.json`
//! 2. `../chonkie.toml`, `../chonkie.json`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chonkie_domain::constants::API_KEY_ENV;

const CONFIG_FILE_NAMES: [&str; 2] = ["chonkie.toml", "chonkie.json"];
use chonkie_domain::{ChonkieError, ChunkerConfig, Result, Tokenizer};

/// Load configuration with the full fallback strategy
///
/// # Errors
/// Returns `ChonkieError::Configuration` if a probed file cannot be read or
/// parsed, or an environment override has an invalid value.
pub fn load() -> Result<ChunkerConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }

    let config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            ChunkerConfig::default()
        }
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Load configuration from defaults plus environment variables only
///
/// # Errors
/// Returns `ChonkieError::Configuration` if a variable has an invalid value.
pub fn load_from_env() -> Result<ChunkerConfig> {
    let config = apply_env_overrides(ChunkerConfig::default(), |name| std::env::var(name).ok())?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ChonkieError::Configuration` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ChunkerConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ChonkieError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ChonkieError::Configuration(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ChonkieError::Configuration(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable, or `None` when unset; empty
/// values are treated as unset.
///
/// # Errors
/// Returns `ChonkieError::Configuration` if a numeric variable cannot be
/// parsed.
pub fn apply_env_overrides<F>(mut config: ChunkerConfig, lookup: F) -> Result<ChunkerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    // The key is used verbatim, like an explicit one
    if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
        config.api_key = Some(key);
    }
    if let Some(base_url) = var("CHONKIE_BASE_URL") {
        config.base_url = base_url;
    }
    if let Some(tokenizer) = var("CHONKIE_TOKENIZER") {
        config.tokenizer = Tokenizer::Named(tokenizer);
    }
    if let Some(value) = var("CHONKIE_CHUNK_SIZE") {
        config.chunk_size = parse_var("CHONKIE_CHUNK_SIZE", &value)?;
    }
    if let Some(value) = var("CHONKIE_MIN_CHARACTERS_PER_CHUNK") {
        config.min_characters_per_chunk = parse_var("CHONKIE_MIN_CHARACTERS_PER_CHUNK", &value)?;
    }
    if let Some(recipe) = var("CHONKIE_RECIPE") {
        config.recipe = recipe;
    }
    if let Some(lang) = var("CHONKIE_LANG") {
        config.lang = lang;
    }
    if let Some(value) = var("CHONKIE_TIMEOUT_SECS") {
        config.timeout_secs = parse_var("CHONKIE_TIMEOUT_SECS", &value)?;
    }
    if let Some(value) = var("CHONKIE_MAX_ATTEMPTS") {
        config.max_attempts = parse_var("CHONKIE_MAX_ATTEMPTS", &value)?;
    }

    Ok(config)
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ChonkieError::Configuration(format!("Invalid {name}: {e}")))
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ChunkerConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ChonkieError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ChonkieError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(ChonkieError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard paths for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    probe_config_paths_in(&std::env::current_dir().ok()?)
}

fn probe_config_paths_in(dir: &Path) -> Option<PathBuf> {
    [dir.to_path_buf(), dir.join("..")]
        .iter()
        .flat_map(|base| CONFIG_FILE_NAMES.iter().map(move |name| base.join(name)))
        .find(|path| path.is_file())
}
