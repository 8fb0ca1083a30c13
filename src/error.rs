//! Configuration error types for the Contiamo client.
//!
//! Errors raised while talking to the API live next to the code that raises
//! them: transport failures in [`crate::clients::HttpError`] and resource,
//! response-shape and data-format failures in [`crate::rest::ResourceError`].
//!
//! # Example
//!
//! ```rust
//! use contiamo::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Contiamo API key.")]
    EmptyApiKey,

    /// Base URL is invalid.
    #[error("Invalid API base URL '{url}'. Expected an http(s) URL such as 'https://api.contiamo.com'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The request timeout must be positive.
    #[error("Request timeout must be greater than zero.")]
    InvalidTimeout,
}
