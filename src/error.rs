//! Error types for the `Skycast` application

use thiserror::Error;

/// Application-level error type.
///
/// Provider faults never appear here: the resolver and fetcher normalize
/// them into invalid-result values at their boundary, so the only errors
/// surfaced as this type are configuration and input problems.
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("{message}")]
    Validation { message: String },
}

impl SkycastError {
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

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            SkycastError::Validation { message } => message.clone(),
        }
    }
}
