//! HTTP response type.
//!
//! [`HttpResponse`] keeps the body as raw text. Parsing it as JSON is the
//! caller's decision, so a malformed body can be reported together with
//! the exact bytes the server sent.

use std::collections::HashMap;

/// Placeholder used when a response body is not valid UTF-8.
pub const UNDECODABLE_BODY: &str =
    "<Could not decode body as utf-8. Please report to support@contiamo.com>";

/// An HTTP response from the Contiamo API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers keyed by lower-cased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    ///
    /// Only finite, non-negative values are kept.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: impl Into<String>) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0);

        Self {
            code,
            headers,
            body: body.into(),
            retry_request_after,
        }
    }

    /// Creates a response from raw body bytes.
    ///
    /// Bodies that are not valid UTF-8 are replaced by [`UNDECODABLE_BODY`].
    #[must_use]
    pub fn from_bytes(code: u16, headers: HashMap<String, Vec<String>>, body: &[u8]) -> Self {
        let text = std::str::from_utf8(body).unwrap_or(UNDECODABLE_BODY);
        Self::new(code, headers, text)
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the raw body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the body is not
    /// valid JSON. An empty body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}
