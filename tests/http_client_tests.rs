//! Integration tests for the HTTP transport.
//!
//! These tests verify default headers, request building, retry handling
//! and response classification against a mock server.

use contiamo::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, API_KEY_HEADER};
use contiamo::{ApiKey, ContiamoConfig, InvalidHttpRequestError};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a transport with the given number of tries.
fn create_http_client(tries: u32) -> HttpClient {
    let config = ContiamoConfig::builder()
        .api_key(ApiKey::new("test-key").unwrap())
        .user_agent_prefix("IntegrationTest/1.0")
        .tries(tries)
        .build()
        .unwrap();
    HttpClient::new(&config)
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_get_sends_default_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/dashboards"))
        .and(header(API_KEY_HEADER, "test-key"))
        .and(header("Accept", "application/json"))
        .and(header_exists("User-Agent"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_http_client(1);
    let request = HttpRequest::builder(
        HttpMethod::Get,
        format!("{}/projects/p1/dashboards", server.uri()),
    )
    .query_param("page", "2")
    .build()
    .unwrap();

    let response = client.request(request).await.unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.json().unwrap(), json!([]));
}

#[tokio::test]
async fn test_post_sends_json_body_and_extra_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/p1/apps/a1/sql"))
        .and(header("Content-Type", "application/json"))
        .and(header("X-Trace", "abc"))
        .and(body_json(json!({"sql": "select 1"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = create_http_client(1);
    let request = HttpRequest::builder(
        HttpMethod::Post,
        format!("{}/projects/p1/apps/a1/sql", server.uri()),
    )
    .body(json!({"sql": "select 1"}))
    .header("X-Trace", "abc")
    .build()
    .unwrap();

    let response = client.request(request).await.unwrap();
    assert!(response.is_ok());
}

#[tokio::test]
async fn test_relative_url_is_rejected_before_sending() {
    let client = create_http_client(1);
    let request = HttpRequest {
        http_method: HttpMethod::Get,
        url: "projects/p1".to_string(),
        body: None,
        query: None,
        extra_headers: None,
        tries: None,
    };

    let result = client.request(request).await;
    assert!(matches!(
        result,
        Err(HttpError::InvalidRequest(InvalidHttpRequestError::RelativeUrl { .. }))
    ));
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn test_single_try_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_http_client(1);
    let request = HttpRequest::builder(HttpMethod::Get, server.uri())
        .build()
        .unwrap();

    let result = client.request(request).await;
    assert!(matches!(result, Err(HttpError::Api(ref e)) if e.code == 500));
}

#[tokio::test]
async fn test_rate_limited_request_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_http_client(3);
    let request = HttpRequest::builder(HttpMethod::Get, server.uri())
        .build()
        .unwrap();

    let response = client.request(request).await.unwrap();
    assert_eq!(response.json().unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn test_infinite_retry_after_uses_fixed_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "inf"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_http_client(2);
    let request = HttpRequest::builder(HttpMethod::Get, server.uri())
        .build()
        .unwrap();

    let response = client.request(request).await.unwrap();
    assert_eq!(response.json().unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn test_exhausted_retries_report_last_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_json(json!({"message": "slow down"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = create_http_client(1);
    let request = HttpRequest::builder(HttpMethod::Get, server.uri())
        .tries(2)
        .build()
        .unwrap();

    match client.request(request).await {
        Err(HttpError::MaxRetries(e)) => {
            assert_eq!(e.tries, 2);
            assert_eq!(e.last.code, 429);
            assert_eq!(e.last.message, "slow down");
        }
        other => panic!("expected MaxRetries, got {other:?}"),
    }
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_forbidden_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-request-id", "req-3")
                .set_body_json(json!({"error": "forbidden"})),
        )
        .mount(&server)
        .await;

    let client = create_http_client(1);
    let request = HttpRequest::builder(HttpMethod::Get, server.uri())
        .build()
        .unwrap();

    match client.request(request).await {
        Err(HttpError::Authentication(e)) => {
            assert_eq!(e.code, 403);
            assert_eq!(e.message, "forbidden");
            assert_eq!(e.error_reference.as_deref(), Some("req-3"));
        }
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_is_api_error_with_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such dashboard"))
        .mount(&server)
        .await;

    let client = create_http_client(1);
    let request = HttpRequest::builder(HttpMethod::Get, server.uri())
        .build()
        .unwrap();

    match client.request(request).await {
        Err(HttpError::Api(e)) => {
            assert_eq!(e.code, 404);
            assert_eq!(e.body, "no such dashboard");
            assert!(e.json_body.is_none());
        }
        other => panic!("expected Api, got {other:?}"),
    }
}
