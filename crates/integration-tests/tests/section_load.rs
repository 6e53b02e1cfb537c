//! Integration tests for the section-load endpoint.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;

use minicart_integration_tests::{TestServer, browser};

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = browser().get(server.url("health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_omitted_sections_load_everything() {
    let server = TestServer::start().await;
    let resp = browser()
        .get(server.url("customer/section/load"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let sections: Value = resp.json().await.unwrap();
    let keys: Vec<&String> = sections.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["cart"]);
}

#[tokio::test]
async fn test_unknown_section_is_bad_request() {
    let server = TestServer::start().await;
    let resp = browser()
        .get(server.url("customer/section/load?sections=cart,wishlist"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("wishlist"));
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let server = TestServer::start().await;
    let resp = browser()
        .get(server.url("customer/section/load?sections=cart"))
        .header("x-request-id", "cf-ray-123")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["x-request-id"], "cf-ray-123");
}
