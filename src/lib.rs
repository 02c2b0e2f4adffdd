//! Sumi-Discussions: a polite discussion thread reader
//!
//! This crate fetches a contiguous range of comments from a paginated,
//! server-rendered discussion thread and normalizes each comment into a
//! structured [`Comment`] record. Pages are requested concurrently with a
//! per-page courtesy delay so the remote site sees a spread of requests
//! rather than a burst.

pub mod config;
pub mod discussion;
pub mod output;

use thiserror::Error;

/// Main error type for Sumi-Discussions operations
#[derive(Debug, Error)]
pub enum DiscussionError {
    #[error("Failed to load discussion {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Failed to load comments page {page} of {url}: {message}")]
    PageFetchFailed {
        url: String,
        page: usize,
        message: String,
    },

    #[error("Unexpected page layout: {0}")]
    LayoutMismatch(String),

    #[error("Invalid discussion URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported by a [`discussion::PageSource`] for a single GET
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Transport(String),
}

/// Result type alias for Sumi-Discussions operations
pub type Result<T> = std::result::Result<T, DiscussionError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use discussion::{
    get_discussion_comments, Comment, DiscussionClient, HttpPageSource, PageSource,
    SteamTimeDecoder, TimestampDecoder,
};
