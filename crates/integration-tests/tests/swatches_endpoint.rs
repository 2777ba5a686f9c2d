//! End-to-end tests for the swatches feed.
//!
//! Each test spawns the real router on an ephemeral port and mocks the
//! Shopify Admin API with wiremock, exercising the full request path from
//! HTTP in to HTTP out.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use swatch_relay_integration_tests::{
    TestApp, app_config, shopify_config, shopify_config_with_timeout,
};
use swatch_relay_server::config::ImageSource;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2024-07/graphql.json";

/// Spawn the relay wired to the given mock Admin server.
async fn relay_against(server: &MockServer, source: ImageSource) -> TestApp {
    let shopify = shopify_config(format!("{}{GRAPHQL_PATH}", server.uri()), source);
    TestApp::spawn(app_config(Some(shopify))).await
}

/// A page of plain labelled swatches.
fn label_page(ids: std::ops::RangeInclusive<u32>, has_next_page: bool) -> Value {
    let edges: Vec<Value> = ids
        .map(|id| {
            json!({
                "cursor": format!("cursor-{id}"),
                "node": {
                    "id": format!("gid://shopify/Metaobject/{id}"),
                    "handle": format!("swatch-{id}"),
                    "fields": [{"key": "label", "value": format!("Swatch {id}")}]
                }
            })
        })
        .collect();

    json!({
        "data": {
            "metaobjects": {
                "pageInfo": {"hasNextPage": has_next_page},
                "edges": edges
            }
        }
    })
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::spawn(app_config(None)).await;

    let resp = reqwest::get(app.url("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ============================================================================
// Feed Tests
// ============================================================================

#[tokio::test]
async fn test_swatches_feed_spans_pages() {
    let server = MockServer::start().await;

    // A full 250-edge page followed by a 10-edge remainder
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": null}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(label_page(1..=250, true)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": "cursor-250"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(label_page(251..=260, false)))
        .expect(1)
        .mount(&server)
        .await;

    let app = relay_against(&server, ImageSource::Lookup).await;
    let resp = reqwest::get(app.url("/swatches")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let body: Value = resp.json().await.unwrap();
    let swatches = body.as_array().unwrap();
    assert_eq!(swatches.len(), 260);

    // Flat contract: no pagination or reference machinery leaks through
    assert_eq!(
        swatches[0],
        json!({
            "id": "gid://shopify/Metaobject/1",
            "handle": "swatch-1",
            "fields": [{"key": "label", "value": "Swatch 1"}]
        })
    );

    let ids: Vec<&str> = swatches
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (1..=260)
        .map(|id| format!("gid://shopify/Metaobject/{id}"))
        .collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_swatches_feed_resolves_main_images() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"type": "swatches"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "metaobjects": {
                    "pageInfo": {"hasNextPage": false},
                    "edges": [
                        {
                            "cursor": "cursor-1",
                            "node": {
                                "id": "gid://shopify/Metaobject/1",
                                "handle": "ruby-red",
                                "fields": [
                                    {"key": "label", "value": "Ruby Red"},
                                    {"key": "main_image", "value": "gid://shopify/MediaImage/11"}
                                ]
                            }
                        }
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            json!({"variables": {"id": "gid://shopify/MediaImage/11"}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"node": {"image": {"url": "https://cdn.shopify.com/ruby.png"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = relay_against(&server, ImageSource::Lookup).await;
    let resp = reqwest::get(app.url("/swatches")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!([{
            "id": "gid://shopify/Metaobject/1",
            "handle": "ruby-red",
            "fields": [
                {"key": "label", "value": "Ruby Red"},
                {"key": "main_image", "value": "https://cdn.shopify.com/ruby.png"}
            ],
            "main_image_url": "https://cdn.shopify.com/ruby.png"
        }])
    );
}

#[tokio::test]
async fn test_api_alias_serves_the_same_feed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(label_page(1..=2, false)))
        .expect(2)
        .mount(&server)
        .await;

    let app = relay_against(&server, ImageSource::Lookup).await;

    let plain: Value = reqwest::get(app.url("/swatches"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let aliased: Value = reqwest::get(app.url("/api/swatches"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(plain, aliased);
}

// ============================================================================
// Error Response Tests
// ============================================================================

#[tokio::test]
async fn test_missing_credentials_return_500() {
    let app = TestApp::spawn(app_config(None)).await;

    let resp = reqwest::get(app.url("/swatches")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Missing environment variables"}));
}

#[tokio::test]
async fn test_upstream_graphql_errors_surface_verbatim() {
    let server = MockServer::start().await;

    // First page succeeds and carries a resolvable media reference
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": null}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "metaobjects": {
                    "pageInfo": {"hasNextPage": true},
                    "edges": [
                        {
                            "cursor": "cursor-1",
                            "node": {
                                "id": "gid://shopify/Metaobject/1",
                                "handle": "ruby-red",
                                "fields": [
                                    {"key": "main_image", "value": "gid://shopify/MediaImage/11"}
                                ]
                            }
                        }
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let errors = json!([
        {
            "message": "Throttled",
            "extensions": {"code": "THROTTLED"}
        },
        {
            "message": "Field 'metaobjects' doesn't exist on type 'QueryRoot'",
            "locations": [{"line": 2, "column": 3}],
            "path": ["query SwatchPage", "metaobjects"]
        }
    ]);

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": "cursor-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": errors
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = relay_against(&server, ImageSource::Lookup).await;
    let resp = reqwest::get(app.url("/swatches")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": errors}));

    // The failed second page aborted the run: two pagination calls, no image
    // lookups for the discarded first page
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_upstream_timeout_returns_500() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(label_page(1..=1, false))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let shopify = shopify_config_with_timeout(
        format!("{}{GRAPHQL_PATH}", server.uri()),
        ImageSource::Lookup,
        Duration::from_millis(100),
    );
    let app = TestApp::spawn(app_config(Some(shopify))).await;

    let resp = reqwest::get(app.url("/swatches")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Upstream request timed out"}));
}

// ============================================================================
// CORS Tests
// ============================================================================

#[tokio::test]
async fn test_preflight_request_is_allowed() {
    let app = TestApp::spawn(app_config(None)).await;

    let client = reqwest::Client::new();
    let resp = client
        .request(reqwest::Method::OPTIONS, app.url("/swatches"))
        .header("Origin", "https://storefront.example.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let allowed_methods = resp
        .headers()
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(allowed_methods.contains("GET"));
}

#[tokio::test]
async fn test_cors_header_present_on_errors_too() {
    let app = TestApp::spawn(app_config(None)).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(app.url("/swatches"))
        .header("Origin", "https://storefront.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
