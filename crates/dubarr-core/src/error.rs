//! Error types for Dubarr
//!
//! This module defines all error types used throughout the library.
//! DubarrError implements Serialize for Tauri compatibility.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for Dubarr operations
#[derive(Error, Debug)]
pub enum DubarrError {
    /// The library service could not be reached, rejected the API key,
    /// or answered with an error status
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Requested resource was not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to decode a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client configuration cannot be used (bad base URL, bad API key)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid series ID provided
    #[error("Invalid series ID: {0}")]
    InvalidId(i64),

    /// A per-series detail fetch failed; nothing was cached for it
    #[error("Fetching series {series_id} failed: {source}")]
    FetchFailed {
        /// Series whose detail fetch failed
        series_id: i64,
        /// Underlying failure
        #[source]
        source: Box<DubarrError>,
    },

    /// The operation was cancelled before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// A spawned task panicked
    #[error("Task failed: {0}")]
    Join(String),
}

impl DubarrError {
    /// Returns true if this error only signals cancellation.
    ///
    /// Cancellation is expected whenever a newer search supersedes an older
    /// one and must never be shown to the user.
    pub fn is_cancelled(&self) -> bool {
        match self {
            DubarrError::Cancelled => true,
            DubarrError::FetchFailed { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DubarrError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            DubarrError::ParseError(error.to_string())
        } else {
            DubarrError::ServiceUnavailable(error.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for DubarrError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_cancelled() {
            DubarrError::Cancelled
        } else {
            DubarrError::Join(error.to_string())
        }
    }
}

/// Serialize DubarrError as a string for Tauri compatibility
impl Serialize for DubarrError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for Dubarr operations
pub type Result<T> = std::result::Result<T, DubarrError>;
