use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the recipes endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API key appended as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of search results shown per page
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,
    /// Delay before the add-recipe window closes after a successful upload
    #[serde(default = "default_modal_close_ms")]
    pub modal_close_ms: u64,
    /// File holding the persisted bookmarks
    #[serde(default = "default_bookmarks_path")]
    pub bookmarks_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            timeout: default_timeout(),
            results_per_page: default_results_per_page(),
            modal_close_ms: default_modal_close_ms(),
            bookmarks_path: default_bookmarks_path(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    "https://forkify-api.herokuapp.com/api/v2/recipes".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_results_per_page() -> usize {
    10
}

fn default_modal_close_ms() -> u64 {
    2500
}

fn default_bookmarks_path() -> PathBuf {
    PathBuf::from("bookmarks.json")
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FORKIFY__ prefix
    /// 2. forkify.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FORKIFY__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("forkify").required(false))
            .add_source(
                Environment::with_prefix("FORKIFY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn modal_close_delay(&self) -> Duration {
        Duration::from_millis(self.modal_close_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.timeout, 10);
        assert_eq!(config.results_per_page, 10);
        assert_eq!(config.modal_close_ms, 2500);
        assert!(config.api_key.is_none());
        assert!(config.api_url.ends_with("/api/v2/recipes"));
    }

    #[test]
    fn test_durations() {
        let config = AppConfig {
            timeout: 3,
            modal_close_ms: 1500,
            ..AppConfig::default()
        };
        assert_eq!(config.timeout_duration(), Duration::from_secs(3));
        assert_eq!(config.modal_close_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"api_key": "abc", "timeout": 5}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.results_per_page, 10);
        assert_eq!(config.bookmarks_path, PathBuf::from("bookmarks.json"));
    }
}
