use thiserror::Error;

/// Errors that can occur while talking to the recipe API or managing state
#[derive(Error, Debug)]
pub enum ForkifyError {
    /// The request did not settle before the configured deadline
    #[error("Request took too long! Timeout after {seconds} second(s)")]
    Timeout { seconds: u64 },

    /// The API answered with a non-success status
    #[error("{message} ({status})")]
    Api { message: String, status: u16 },

    /// A user-submitted field could not be parsed
    #[error("{0}")]
    Format(String),

    /// Persisted bookmarks could not be read back
    #[error("Stored bookmarks are unreadable: {0}")]
    Storage(String),

    /// Transport failure
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The API body did not have the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ForkifyError>;
