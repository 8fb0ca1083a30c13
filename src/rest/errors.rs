//! Error types for resource and query operations.
//!
//! [`ResourceError`] is what every operation in [`crate::rest`] returns. It
//! wraps transport failures and adds the failures that only the resource
//! layer can detect:
//!
//! - [`ResourceError::InvalidRequest`]: caller input rejected before any network call
//! - [`ResourceError::ResponseShape`]: a 2xx response did not have the expected shape
//! - [`ResourceError::DataFormat`]: a query-result cell failed type-directed parsing
//!
//! Use [`ResourceError::kind`] to branch on the failure class without caring
//! which layer detected it.
//!
//! # Example
//!
//! ```rust,ignore
//! use contiamo::rest::{ErrorKind, ResourceError};
//!
//! match client.query_contract("labs:p1:a1:orders", 500, Default::default()).await {
//!     Ok(result) => println!("{} rows", result.len()),
//!     Err(e) if e.kind() == ErrorKind::InvalidRequest => println!("Fix your input: {e}"),
//!     Err(e) => println!("Request failed ({:?}): {e}, status {:?}", e.kind(), e.http_status()),
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::clients::{HttpError, HttpResponse, InvalidHttpRequestError};

/// Flat classification of every failure the client can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transport could not complete the request.
    Connection,
    /// The remote rejected the credentials.
    Authentication,
    /// The remote reported a failure.
    Api,
    /// Caller input was rejected before or instead of a network call.
    InvalidRequest,
    /// A successful-looking response did not match the expected envelope.
    ResponseShape,
    /// A query-result value could not be parsed according to its column type.
    DataFormat,
}

/// Raw HTTP context attached to response-shape errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpContext {
    /// The HTTP status code, when the failure came straight from a response.
    pub status: Option<u16>,
    /// The raw response body.
    pub body: Option<String>,
    /// Response headers keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The body as JSON, when it parsed.
    pub json_body: Option<serde_json::Value>,
}

impl HttpContext {
    /// Captures the context of a raw response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        Self {
            status: Some(response.code),
            body: Some(response.body.clone()),
            headers: response.headers.clone(),
            json_body: response.json().ok(),
        }
    }

    /// Captures the context of an already-parsed response body.
    #[must_use]
    pub fn from_json(body: &serde_json::Value) -> Self {
        Self {
            status: None,
            body: Some(body.to_string()),
            headers: HashMap::new(),
            json_body: Some(body.clone()),
        }
    }

    /// Returns a copy of `response` when the body came from one, otherwise
    /// captures `body` alone.
    pub(crate) fn for_body(response: Option<&Self>, body: &serde_json::Value) -> Self {
        response.cloned().unwrap_or_else(|| Self::from_json(body))
    }

    fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Error type for resource and query operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The transport reported a failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Caller input was rejected.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the input.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("The response from the server was invalid. Please report the bug to support@contiamo.com\n{message}")]
    ResponseShape {
        /// Description including the underlying failure's own message.
        message: String,
        /// The offending response.
        context: Box<HttpContext>,
    },

    /// A query-result cell could not be parsed.
    #[error("Could not parse {value} in column '{column}' at row {row}: {message}")]
    DataFormat {
        /// Name of the offending column.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// The raw wire value.
        value: String,
        /// The parser's message.
        message: String,
    },
}

impl ResourceError {
    /// Builds a [`ResourceError::ResponseShape`] and logs the raw response.
    ///
    /// This is the single place where the resource layer logs: one
    /// error-level line per invalid response, before the error is returned.
    pub(crate) fn invalid_response(cause: impl fmt::Display, context: HttpContext) -> Self {
        tracing::error!("Invalid JSON response: {}", context.body_text());
        Self::ResponseShape {
            message: format!(
                "The following error was raised when interpreting the response:\n{cause}"
            ),
            context: Box::new(context),
        }
    }

    /// Builds a [`ResourceError::InvalidRequest`].
    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(HttpError::Connection(_)) => ErrorKind::Connection,
            Self::Http(HttpError::Authentication(_)) => ErrorKind::Authentication,
            Self::Http(HttpError::Api(_) | HttpError::MaxRetries(_)) => ErrorKind::Api,
            Self::Http(HttpError::InvalidRequest(_)) | Self::InvalidRequest { .. } => {
                ErrorKind::InvalidRequest
            }
            Self::ResponseShape { .. } => ErrorKind::ResponseShape,
            Self::DataFormat { .. } => ErrorKind::DataFormat,
        }
    }

    /// Returns the HTTP status code, if a response was involved.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.response().map(|r| r.code),
            Self::ResponseShape { context, .. } => context.status,
            _ => None,
        }
    }

    /// Returns the raw response body, if a response was involved.
    #[must_use]
    pub fn http_body(&self) -> Option<&str> {
        match self {
            Self::Http(e) => e.response().map(|r| r.body.as_str()),
            Self::ResponseShape { context, .. } => context.body.as_deref(),
            _ => None,
        }
    }

    /// Returns the response headers, if a response was involved.
    #[must_use]
    pub fn headers(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            Self::Http(e) => e.response().map(|r| &r.headers),
            Self::ResponseShape { context, .. } => Some(&context.headers),
            _ => None,
        }
    }

    /// Returns the response body parsed as JSON, if it was valid JSON.
    #[must_use]
    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http(e) => e.response().and_then(|r| r.json_body.as_ref()),
            Self::ResponseShape { context, .. } => context.json_body.as_ref(),
            _ => None,
        }
    }

    /// Returns the request ID for error reporting, if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Http(e) => e.response().and_then(|r| r.error_reference.as_deref()),
            Self::ResponseShape { context, .. } => context
                .headers
                .get("x-request-id")
                .and_then(|values| values.first())
                .map(String::as_str),
            _ => None,
        }
    }
}

impl From<InvalidHttpRequestError> for ResourceError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
