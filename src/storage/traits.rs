//! Storage traits and error types
//!
//! This module defines the trait interface for record sinks and the
//! associated error types.

use crate::storage::Record;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Output directory unavailable: {0}")]
    OutputDir(String),

    #[error("Invalid item id '{0}': must be non-empty digits")]
    InvalidItemId(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for extracted listing records
///
/// Implementations address each record solely by its item id: persisting the
/// same id twice replaces the earlier record (last writer wins). Failures are
/// returned to the caller as-is; sinks never retry or buffer.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persists one record under its item id
    async fn persist(&self, record: &Record, item_id: &str) -> StorageResult<()>;
}
