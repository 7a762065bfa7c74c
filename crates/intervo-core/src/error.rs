//! Core error types for intervo-core.
//!
//! Every fallible operation in the library reports one of these, built with
//! thiserror so the CLI can print them directly.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intervo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Audio output errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// The file was read but is not valid configuration TOML
    #[error("Failed to parse configuration {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// Validation errors raised at the input boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures reported by an audio output resource.
///
/// The playlist controller passes these through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The locator was revoked (or never minted).
    #[error("playable reference {0} is no longer valid")]
    Revoked(String),

    /// The payload could not be decoded by the output.
    #[error("cannot decode {reference}: {message}")]
    Decode { reference: String, message: String },

    /// `play` was issued before anything was loaded.
    #[error("no track loaded")]
    NothingLoaded,

    /// The playback backend itself failed.
    #[error("audio backend failed: {0}")]
    Backend(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
