//! Transport error types.
//!
//! The transport classifies every failure it observes before handing it to
//! the resource layer:
//!
//! - [`HttpError::Connection`]: the request never produced a response
//! - [`HttpError::Authentication`]: the remote rejected the API key (401/403)
//! - [`HttpError::Api`]: any other non-2xx response
//! - [`HttpError::MaxRetries`]: retries of 429/500 responses were exhausted
//! - [`HttpError::InvalidRequest`]: the request failed validation before sending
//!
//! # Example
//!
//! ```rust,ignore
//! use contiamo::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("{}", response.text()),
//!     Err(HttpError::Authentication(e)) => println!("Check your API key: {}", e.code),
//!     Err(HttpError::Api(e)) => println!("Server said {}: {}", e.code, e.message),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use std::collections::HashMap;

use thiserror::Error;

/// A non-successful HTTP response.
///
/// Carries everything needed to report the failure without re-issuing the
/// request: status, raw body, headers and the body parsed as JSON when it
/// was valid JSON.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable summary extracted from the response body.
    pub message: String,
    /// The raw response body.
    pub body: String,
    /// Response headers, keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The response body parsed as JSON, if it was valid JSON.
    pub json_body: Option<serde_json::Value>,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when retry attempts have been exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {}", .last.message)]
pub struct MaxHttpRetriesExceededError {
    /// The number of tries that were attempted.
    pub tries: u32,
    /// The last response received.
    pub last: HttpResponseError,
}

/// Error returned when an HTTP request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request URL is not absolute.
    #[error("Request URL '{url}' must be an absolute http(s) URL.")]
    RelativeUrl {
        /// The offending URL.
        url: String,
    },
}

/// Unified error type for everything the transport can report.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API rejected the credentials (HTTP 401 or 403).
    #[error("Authentication failed ({}): {}", .0.code, .0.message)]
    Authentication(HttpResponseError),

    /// The API returned a non-2xx status other than an authentication failure.
    #[error("API error ({}): {}", .0.code, .0.message)]
    Api(HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The request could not be completed (DNS, TLS, timeout, reset).
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the failed response, if the error was caused by one.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponseError> {
        match self {
            Self::Authentication(e) | Self::Api(e) => Some(e),
            Self::MaxRetries(e) => Some(&e.last),
            Self::InvalidRequest(_) | Self::Connection(_) => None,
        }
    }
}
