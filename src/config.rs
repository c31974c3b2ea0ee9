//! Runtime configuration from environment variables
//!
//! Binaries call `dotenvy::dotenv().ok()` first so a local `.env` file is honoured.

use crate::error::{ExplorerError, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const ENV_API_BASE_URL: &str = "SEABED_API_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SEABED_HTTP_TIMEOUT_SECS";
pub const ENV_MEDIA_TIMEOUT_SECS: &str = "SEABED_MEDIA_TIMEOUT_SECS";
pub const ENV_PREFERENCES_PATH: &str = "SEABED_PREFERENCES_PATH";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "SEABED_SEARCH_DEBOUNCE_MS";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MEDIA_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PREFERENCES_PATH: &str = ".seabed-explorer/preferences.json";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// API root; endpoint paths are appended to it
    pub api_base_url: Url,
    pub http_timeout: Duration,
    /// Gallery media requests abort after this long
    pub media_timeout: Duration,
    pub preferences_path: PathBuf,
    pub search_debounce: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            media_timeout: Duration::from_secs(DEFAULT_MEDIA_TIMEOUT_SECS),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl ExplorerConfig {
    /// Create config from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = parse_base_url(&raw)?;
        }
        if let Some(secs) = parse_number(&lookup, ENV_HTTP_TIMEOUT_SECS) {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_number(&lookup, ENV_MEDIA_TIMEOUT_SECS) {
            config.media_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(ENV_PREFERENCES_PATH).filter(|v| !v.trim().is_empty()) {
            config.preferences_path = PathBuf::from(path);
        }
        if let Some(ms) = parse_number(&lookup, ENV_SEARCH_DEBOUNCE_MS) {
            config.search_debounce = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

/// Normalise so `Url::join` appends instead of replacing the last segment
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash).map_err(|source| ExplorerError::InvalidBaseUrl {
        url: trimmed.to_string(),
        source,
    })
}

fn parse_number<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric configuration value");
            None
        }
    }
}
