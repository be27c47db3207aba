// src/error.rs

//! Unified error handling for the notifier.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for notifier operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Content API answered with a non-success status
    #[error("API error on {endpoint} ({status}): {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Chat API refused the message
    #[error("Notification error: {0}")]
    Notify(String),

    /// A persisted state file exists but could not be decoded
    #[error("Corrupt state file {path}: {message}")]
    Decode { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a content API error for an endpoint.
    pub fn api(endpoint: impl Into<String>, status: u16, message: impl fmt::Display) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            status,
            message: message.to_string(),
        }
    }

    /// Create a state decode error for a file.
    pub fn decode(path: &Path, message: impl fmt::Display) -> Self {
        Self::Decode {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
