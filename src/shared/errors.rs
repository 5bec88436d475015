//! Error handling for the application

use thiserror::Error;

/// Statistics engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Price feed unavailable for {ticker}: {reason}")]
    FeedUnavailable { ticker: String, reason: String },

    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Degenerate series for {ticker}: zero price variance")]
    DegenerateSeries { ticker: String },
}

impl StatsError {
    pub fn feed_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        StatsError::FeedUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

/// Price feed transport errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Invalid feed payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Decode(err.to_string())
        } else {
            FeedError::Http(err.to_string())
        }
    }
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
