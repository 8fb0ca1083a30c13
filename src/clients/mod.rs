//! HTTP transport for Contiamo API communication.
//!
//! This module is the transport collaborator used by the resource layer in
//! [`crate::rest`]. It owns everything the resource layer deliberately does
//! not: authentication headers, TLS, timeouts and retries.
//!
//! - [`HttpClient`]: the async HTTP client
//! - [`HttpRequest`]: a request with an absolute URL and optional JSON body
//! - [`HttpResponse`]: status, headers and the raw body of a 2xx response
//! - [`HttpError`]: connection, authentication and API failures
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: retried using `Retry-After`, or 1 second if absent
//! - **500 (Server Error)**: retried after a fixed 1-second delay
//! - **Other errors**: returned immediately
//!
//! The default is a single attempt. Configure retries with
//! [`ContiamoConfigBuilder::tries`](crate::ContiamoConfigBuilder::tries) or
//! per request with [`HttpRequestBuilder::tries`].

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, API_KEY_HEADER, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, UNDECODABLE_BODY};
