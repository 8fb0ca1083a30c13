//! HTTP client for Contiamo API communication.
//!
//! [`HttpClient`] is the transport collaborator of the resource layer. It
//! owns authentication headers, retries and the request timeout; the layers
//! above only hand it absolute URLs and JSON bodies.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ContiamoConfig;

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// HTTP client for making requests to the Contiamo API.
///
/// The client handles:
/// - Default headers including User-Agent and the API key
/// - Classification of non-2xx responses into [`HttpError`] variants
/// - Automatic retry of 429 and 500 responses when `tries > 1`
///
/// `HttpClient` is `Send + Sync`. Its `Debug` output never includes the
/// API key.
///
/// # Example
///
/// ```rust,ignore
/// use contiamo::clients::{HttpClient, HttpMethod, HttpRequest};
/// use contiamo::{ApiKey, ContiamoConfig};
///
/// let config = ContiamoConfig::builder()
///     .api_key(ApiKey::new("my-key").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "https://api.contiamo.com/projects/1")
///     .build()
///     .unwrap();
/// let response = client.request(request).await?;
/// ```
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
    tries: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut header_names: Vec<&str> = self.default_headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();
        f.debug_struct("HttpClient")
            .field("default_headers", &header_names)
            .field("tries", &self.tries)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &ContiamoConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Contiamo API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            API_KEY_HEADER.to_string(),
            config.api_key().as_ref().to_string(),
        );

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self {
            client,
            default_headers,
            tries: config.tries(),
        }
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the default number of attempts per request.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Sends an HTTP request.
    ///
    /// Returns the response for any 2xx status. The body is not parsed here.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request could not be completed (`Connection`)
    /// - The API answered 401 or 403 (`Authentication`)
    /// - The API answered any other non-2xx status (`Api`)
    /// - Retries of 429/500 responses were exhausted (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let max_tries = request.tries.unwrap_or(self.tries).max(1);
        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
                HttpMethod::Put => self.client.put(&request.url),
                HttpMethod::Delete => self.client.delete(&request.url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let bytes = res.bytes().await?;
            let response = HttpResponse::from_bytes(code, res_headers, &bytes);

            if response.is_ok() {
                return Ok(response);
            }

            let should_retry = code == 429 || code == 500;
            if !should_retry || tries >= max_tries {
                let error = Self::response_error(response);
                if should_retry && max_tries > 1 {
                    tracing::warn!(
                        "Giving up on {} {} after {} tries (last status {})",
                        request.http_method,
                        request.url,
                        tries,
                        code
                    );
                    return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                        tries,
                        last: error,
                    }));
                }
                return Err(if code == 401 || code == 403 {
                    HttpError::Authentication(error)
                } else {
                    HttpError::Api(error)
                });
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::debug!(
                "Retrying {} {} in {:?} (status {}, try {} of {})",
                request.http_method,
                request.url,
                delay,
                code,
                tries,
                max_tries
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> Duration {
        // Retry-After is only honoured for 429
        if status == 429 {
            if let Some(delay) = response
                .retry_request_after
                .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            {
                return delay;
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }

    /// Builds the error value for a non-2xx response.
    fn response_error(response: HttpResponse) -> HttpResponseError {
        let json_body = response.json().ok();
        let message = Self::summarize_error(json_body.as_ref(), &response.body, response.code);
        let error_reference = response.request_id().map(String::from);

        HttpResponseError {
            code: response.code,
            message,
            body: response.body,
            headers: response.headers,
            json_body,
            error_reference,
        }
    }

    /// Picks a human-readable message out of an error body.
    fn summarize_error(json_body: Option<&serde_json::Value>, raw: &str, code: u16) -> String {
        let from_json = json_body.and_then(|body| {
            ["message", "error", "errors", "error_description"]
                .iter()
                .find_map(|key| body.get(*key))
                .map(|value| match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
        });

        from_json.unwrap_or_else(|| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                format!("HTTP {code}")
            } else {
                trimmed.to_string()
            }
        })
    }
}
