//! Facet-Sweep: a session-aware marketplace listing crawler
//!
//! This crate negotiates a search session with a marketplace, enumerates the
//! item "condition" facets it exposes, and walks every listing page of each
//! facet, persisting one JSON record per item id.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Facet-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Protocol error from {endpoint}: {message}")]
    Protocol { endpoint: String, message: String },

    #[error("Malformed JSON from {endpoint}: {source}")]
    Json {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("No _ssn session id in resolved URL {url}")]
    MissingSessionId { url: String },

    #[error("Session token rejected for session {session_id}")]
    TokenRejected { session_id: String },

    #[error("Facet group '{field}' missing from refine response")]
    FacetGroupMissing { field: String },

    #[error("Condition '{requested}' not found")]
    FacetNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
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

/// Result type alias for Facet-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlMode, Facet, Page, Record, Session};
pub use state::PageOutcome;
