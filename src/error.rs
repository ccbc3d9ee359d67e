//! Error types and handling for the vaderkollen crate

use thiserror::Error;

/// Main error type for the vaderkollen crate
#[derive(Error, Debug)]
pub enum VaderkollenError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Every fetch strategy, including the fallback, was exhausted
    #[error("Weather data unavailable: {message}")]
    Unavailable { message: String },

    /// HTTP transport errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

impl VaderkollenError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new terminal unavailable error
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message. Terminal aggregation failures
    /// always read as retryable, never as a crash.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            VaderkollenError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            VaderkollenError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            VaderkollenError::Unavailable { .. } | VaderkollenError::Http { .. } => {
                "Could not reach the weather services. Please try the search again.".to_string()
            }
        }
    }
}
