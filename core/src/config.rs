//! Where the PocketShelf API lives.
//!
//! The base URL is resolved once when the process starts and handed to the
//! clients by value; nothing here is re-read later.

use crate::error::ConfigError;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "POCKETSHELF_API_URL";

/// Base URL used when nothing is configured (the server's default port).
pub const DEFAULT_API_URL: &str = "http://localhost:4567/api/";

/// Validated connection settings for the API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    /// Read `POCKETSHELF_API_URL`, falling back to `DEFAULT_API_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_URL_ENV) {
            Some(url) => Self::new(&url),
            None => Self::new(DEFAULT_API_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}
