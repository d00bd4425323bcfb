use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Path of the comparison endpoint, relative to the base URL.
pub const COMPARE_PATH: &str = "/api/compare-embeddings";
/// Path of the embedding endpoint, relative to the base URL.
pub const EMBED_PATH: &str = "/api/embed-text";

const ENV_API_URL: &str = "SENTENCE_COMPARE_API_URL";
const ENV_TIMEOUT: &str = "SENTENCE_COMPARE_TIMEOUT_SECS";
const ENV_TITLE: &str = "SENTENCE_COMPARE_TITLE";
const ENV_USER: &str = "SENTENCE_COMPARE_USER";

/// Configuration for the application
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Base URL of the comparison service, without the `/api/...` path
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client
    pub timeout: Duration,
    /// Title shown in the header banner
    pub app_title: String,
    /// Optional user label shown next to the title
    pub user_label: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:8005"),
            timeout: Duration::from_secs(30),
            app_title: String::from("Analista de sentencias"),
            user_label: None,
        }
    }
}

impl Config {
    /// Create a configuration pointing at `base_url`, other fields defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load `.env` (if present) and read overrides from the environment
    pub fn from_env() -> Result<Self> {
        // A missing .env file is not an error
        if let Err(e) = dotenv::dotenv() {
            if !e.not_found() {
                return Err(AppError::Config(format!("failed to load .env: {}", e)));
            }
        }
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load variables from a specific env file, then read overrides
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        dotenv::from_path(path).map_err(|e| {
            AppError::Config(format!("failed to load {}: {}", path.display(), e))
        })?;
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT, secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(title) = lookup(ENV_TITLE) {
            config.app_title = title;
        }
        config.user_label = lookup(ENV_USER).filter(|u| !u.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Check the base URL is usable
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(AppError::Config("base URL must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "base URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.timeout.is_zero() {
            return Err(AppError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Full URL of the comparison endpoint
    pub fn compare_url(&self) -> String {
        crate::utils::join_url(&self.base_url, COMPARE_PATH)
    }

    /// Full URL of the embedding endpoint
    pub fn embed_url(&self) -> String {
        crate::utils::join_url(&self.base_url, EMBED_PATH)
    }
}
