//! Core error types for focushub-core.
//!
//! Hub mutations themselves never fail -- invalid input degrades to a no-op.
//! Errors exist at the boundaries: snapshot I/O, configuration files, and the
//! quote feed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focushub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Quote feed errors
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Snapshot-storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Snapshot file exists but cannot be read
    #[error("Failed to read snapshot at {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Snapshot could not be written
    #[error("Failed to write snapshot to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Snapshot file exists but is not valid JSON for the current schema
    #[error("Corrupt snapshot at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config directory could not be resolved or created
    #[error("Failed to prepare config directory: {0}")]
    Dir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Quote-feed errors.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Feed URL rejected before any request was made
    #[error("Invalid quote feed URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Network-level failure
    #[error("Quote request failed: {0}")]
    RequestFailed(String),

    /// Feed answered with a non-success status
    #[error("Quote feed returned HTTP {status}")]
    BadStatus { status: u16 },

    /// Feed answered with a body we cannot use
    #[error("Quote feed returned an unusable payload: {0}")]
    BadPayload(String),

    /// Feed answered with an empty array
    #[error("Quote feed returned no quotes")]
    EmptyFeed,
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QuoteError::BadPayload(err.to_string())
        } else {
            QuoteError::RequestFailed(err.to_string())
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
