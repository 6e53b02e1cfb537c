//! Integration tests for Minicart.
//!
//! Each test starts the storefront in-process on an ephemeral port and talks
//! to it over HTTP with a cookie-keeping client, so the session cookie flows
//! exactly as it would from a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p minicart-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::path::Path;
use std::sync::Arc;

use reqwest::{Client, Response};
use serde_json::Value;
use tokio::task::JoinHandle;

use minicart_storefront::catalog::Catalog;
use minicart_storefront::config::StorefrontConfig;
use minicart_storefront::session::{SaveHandler, SaveHandlerKind};
use minicart_storefront::state::AppState;

/// Catalog shared by the tests.
///
/// - 1: visible simple product
/// - 2: hidden product with a visible URL rewrite in store 1
/// - 3: hidden product without any rewrite
/// - 4: visible product priced below its MSRP
pub const TEST_CATALOG: &str = r#"{
    "products": [
        { "id": 1, "sku": "MB01", "name": "Joust Duffle Bag", "url_key": "joust-duffle-bag",
          "visibility": 4, "price": "34.00",
          "image": { "path": "/m/b/mb01-blue-0.jpg", "label": "Joust Duffle Bag, blue" } },
        { "id": 2, "sku": "MB02", "name": "Strive Shoulder Pack", "visibility": 1, "price": "32.00" },
        { "id": 3, "sku": "24-WG085", "name": "Sprite Yoga Strap", "visibility": 1, "price": "14.00" },
        { "id": 4, "sku": "WJ01", "name": "Stellar Solar Jacket", "url_key": "stellar-solar-jacket",
          "visibility": 4, "price": "75.00", "msrp": "99.00",
          "msrp_display": "before_order_confirm", "minimal_price": "60.00" }
    ],
    "rewrites": [
        { "product_id": 2, "store_id": 1, "request_path": "gear/strive-shoulder-pack.html", "visibility": 4 }
    ]
}"#;

/// A storefront running on a local ephemeral port.
pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with in-memory sessions and default settings.
    pub async fn start() -> Self {
        Self::start_with(SaveHandlerKind::Memory, Path::new("unused"), &[]).await
    }

    /// Start a server with the given save handler and extra environment.
    pub async fn start_with(
        handler: SaveHandlerKind,
        save_path: &Path,
        vars: &[(&str, &str)],
    ) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}/");

        let config = StorefrontConfig::from_lookup(|key| {
            if key == "STOREFRONT_BASE_URL" {
                return Some(base_url.clone());
            }
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string())
        })
        .expect("Invalid test configuration");

        let catalog = Catalog::from_json_str(TEST_CATALOG).expect("Invalid test catalog");
        let store = SaveHandler::open(handler, save_path)
            .await
            .expect("Failed to open session store");
        let app = minicart_storefront::app(AppState::new(config, Arc::new(catalog)), store);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self { base_url, handle }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A client that keeps the session cookie between requests.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Load the cart section through the section-load endpoint.
pub async fn load_cart(client: &Client, server: &TestServer) -> Value {
    let resp = client
        .get(server.url("customer/section/load?sections=cart"))
        .send()
        .await
        .expect("Failed to load sections");
    assert!(resp.status().is_success(), "section load failed: {}", resp.status());
    let mut sections: Value = resp.json().await.expect("Sections are not JSON");
    sections["cart"].take()
}

/// Add a product to the cart.
pub async fn add_to_cart(client: &Client, server: &TestServer, product_id: i32, qty: &str) -> Response {
    client
        .post(server.url("cart/add"))
        .form(&[("product_id", product_id.to_string()), ("qty", qty.to_string())])
        .send()
        .await
        .expect("Failed to add to cart")
}
