// src/error.rs

//! Unified error handling for the spider.

use std::fmt;

use thiserror::Error;

/// Result type alias for spider operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Credentials were rejected by the portal's SSO. Terminal for the run.
    #[error("The given username or password was incorrect")]
    Authentication,

    /// A page's markup does not match the minimum expected shape.
    ///
    /// Distinct from the lenient per-field fallbacks in the coursework
    /// extractor, which never raise.
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

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

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Snapshot store error
    #[error("Store error: {0}")]
    Store(String),

    /// Mail delivery failed
    #[error("Mail delivery error: {0}")]
    Mail(String),
}

impl AppError {
    /// Create a structural parse error with page context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a mail delivery error.
    pub fn mail(message: impl Into<String>) -> Self {
        Self::Mail(message.into())
    }
}
