//! Integration tests for the resource hierarchy.
//!
//! These tests drive the client against a mock server and verify URL
//! derivation, list envelope handling, hydration and the write operations.

use contiamo::rest::resources::App;
use contiamo::rest::{ErrorKind, Listing, ResourceId, Retrievable, Updateable};
use contiamo::Client;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointing at the mock server.
fn create_client(server: &MockServer) -> Client {
    Client::new("test-key", Some(&server.uri())).unwrap()
}

// === URL derivation ===

#[test]
fn test_instance_url_follows_the_parent_chain() {
    let client = Client::new("test-key", Some("https://api.test")).unwrap();
    let widget = client.project("p").dashboard("d").widget("w");

    assert_eq!(
        widget.instance_url(),
        "https://api.test/projects/p/dashboards/d/widgets/w"
    );
    assert_eq!(client.project("p").apps().class_url(), "https://api.test/projects/p/apps");
    assert_eq!(widget.kind_name(), "ClientProjectDashboardWidget");
}

#[test]
fn test_widget_kinds_under_different_dashboards_do_not_share_urls() {
    let client = Client::new("test-key", Some("https://api.test")).unwrap();
    let project = client.project("p");

    let first = project.dashboard("d1").widgets();
    let second = project.dashboard("d2").widgets();

    assert_ne!(first.class_url(), second.class_url());
    assert_eq!(first.name(), second.name());
}

// === list ===

#[tokio::test]
async fn test_list_returns_bare_array_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/dashboards"))
        .and(header("X-API-KEY", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "d1", "name": "Sales"},
            {"id": "d2", "name": "Ops"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let listing = assert_ok!(client.project("p1").dashboards().list(false).await);

    let records = listing.into_raw().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1], json!({"id": "d2", "name": "Ops"}));
}

#[tokio::test]
async fn test_list_unwraps_resources_envelope_and_instantiates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/dashboards/d1/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"id": 7, "title": "Revenue"}, {"id": 8, "title": "Churn"}],
            "count": 2
        })))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let widgets = client.project("p1").dashboard("d1").widgets();
    let listing = assert_ok!(widgets.list(true).await);

    let Listing::Instances(instances) = listing else {
        panic!("expected instances");
    };
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].id(), &ResourceId::from(7_i64));
    assert_eq!(instances[0].get_attr("title"), Some(&json!("Revenue")));
    assert_eq!(
        instances[1].instance_url(),
        format!("{}/projects/p1/dashboards/d1/widgets/8", server.uri())
    );
}

#[tokio::test]
async fn test_envelope_and_bare_array_list_identically() {
    let records = json!([{"id": "a1", "name": "Shop"}, {"id": "a2", "name": "CRM"}]);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/bare/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/wrapped/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resources": records})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let bare = assert_ok!(client.project("bare").apps().list(false).await);
    let wrapped = assert_ok!(client.project("wrapped").apps().list(false).await);
    assert_eq!(bare.into_raw(), wrapped.into_raw());

    let bare = assert_ok!(client.project("bare").apps().list(true).await);
    let wrapped = assert_ok!(client.project("wrapped").apps().list(true).await);
    let attributes = |listing: Listing<App>| {
        listing
            .into_instances()
            .unwrap()
            .into_iter()
            .map(|app| (app.id().to_string(), app.into_attributes()))
            .collect::<Vec<_>>()
    };
    assert_eq!(attributes(bare), attributes(wrapped));
}

#[tokio::test]
async fn test_list_object_without_resources_is_a_shape_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/apps"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-42")
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = assert_err!(client.project("p1").apps().list(false).await);

    assert_eq!(error.kind(), ErrorKind::ResponseShape);
    assert_eq!(error.json_body(), Some(&json!({})));
    assert_eq!(error.http_status(), Some(200));
    assert_eq!(error.request_id(), Some("req-42"));
    assert_eq!(error.http_body(), Some("{}"));
}

#[tokio::test]
async fn test_listed_record_without_id_carries_the_list_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/apps"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-43")
                .set_body_json(json!([{"id": "a1"}, {"name": "orphan"}])),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = assert_err!(client.project("p1").apps().list(true).await);

    assert_eq!(error.kind(), ErrorKind::ResponseShape);
    assert_eq!(error.http_status(), Some(200));
    assert_eq!(error.request_id(), Some("req-43"));
    assert_eq!(error.json_body(), Some(&json!([{"id": "a1"}, {"name": "orphan"}])));
}

// === retrieve / refresh ===

#[tokio::test]
async fn test_retrieve_hydrates_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/apps/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "a1", "name": "Shop data"})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let app = assert_ok!(client.project("p1").apps().retrieve("a1").await);

    assert_eq!(app.id().to_string(), "a1");
    assert_eq!(app.get_attr("name"), Some(&json!("Shop data")));
}

#[tokio::test]
async fn test_refresh_replaces_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/dashboards/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "d1", "name": "Fresh"})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let mut dashboard = client.project("p1").dashboard("d1");
    dashboard
        .hydrate(json!({"id": "d1", "name": "Stale", "archived": true}))
        .unwrap();

    assert_ok!(dashboard.refresh().await);

    assert_eq!(dashboard.get_attr("name"), Some(&json!("Fresh")));
    assert!(dashboard.get_attr("archived").is_none());
}

// === create / modify ===

#[tokio::test]
async fn test_create_posts_model_to_class_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/p1/dashboards"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Funnel"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "d9", "name": "Funnel"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let dashboard = assert_ok!(
        client
            .project("p1")
            .dashboards()
            .create(&json!({"name": "Funnel"}))
            .await
    );

    assert_eq!(dashboard.id().to_string(), "d9");
    assert_eq!(
        dashboard.instance_url(),
        format!("{}/projects/p1/dashboards/d9", server.uri())
    );
}

#[tokio::test]
async fn test_create_response_without_id_is_a_shape_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/p1/dashboards/d1/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "No id"})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let widgets = client.project("p1").dashboard("d1").widgets();
    let error = assert_err!(widgets.create(&json!({"title": "No id"})).await);

    assert_eq!(error.kind(), ErrorKind::ResponseShape);
    assert_eq!(error.http_status(), Some(200));
    assert!(error.headers().is_some_and(|headers| !headers.is_empty()));
}

#[tokio::test]
async fn test_modify_puts_model_to_instance_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/projects/p1/dashboards/d1/widgets/w1"))
        .and(body_json(json!({"title": "Net revenue"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "w1", "title": "Net revenue"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let widget = client.project("p1").dashboard("d1").widget("w1");
    let updated = assert_ok!(widget.modify(&json!({"title": "Net revenue"}), None).await);

    assert_eq!(updated.id(), widget.id());
    assert_eq!(updated.get_attr("title"), Some(&json!("Net revenue")));
}

// === hydration round trip ===

#[test]
fn test_instantiate_from_response_keeps_id_and_every_field() {
    let client = Client::new("test-key", Some("https://api.test")).unwrap();
    let response = json!({"id": "w5", "title": "Revenue", "spec": {"type": "line"}});

    let widget = client
        .project("p")
        .dashboard("d")
        .widgets()
        .instantiate_from_response(response.clone())
        .unwrap();

    assert_eq!(widget.id().to_string(), "w5");
    assert_eq!(serde_json::Value::Object(widget.into_attributes()), response);
}

// === verb helpers ===

#[tokio::test]
async fn test_get_with_sub_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/p1/dashboards/d1/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"format": "pdf"})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let body = assert_ok!(
        client
            .project("p1")
            .dashboard("d1")
            .get(None, Some("export"))
            .await
    );

    assert_eq!(body, json!({"format": "pdf"}));
}

#[tokio::test]
async fn test_post_with_explicit_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/custom/endpoint"))
        .and(body_json(json!({"q": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let url = format!("{}/custom/endpoint", server.uri());
    let body = assert_ok!(
        client
            .project("p1")
            .post(&json!({"q": 1}), Some(&url), None)
            .await
    );

    assert_eq!(body, json!({"ok": true}));
}
