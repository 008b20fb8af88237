use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Feed errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("Feed has no items: {0}")]
    EmptyFeed(String),

    // Page errors
    #[error("No element with class '{0}' found in page")]
    MissingTargetElement(String),

    #[error("Invalid class name: {0:?}")]
    InvalidClassName(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PostResult<T> = Result<T, PostError>;
