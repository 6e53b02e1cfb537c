//! Integration tests for file-backed session persistence.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use minicart_storefront::session::SaveHandlerKind;

use minicart_integration_tests::{TestServer, add_to_cart, browser, load_cart};

fn session_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("sess_"))
        .collect()
}

#[tokio::test]
async fn test_cart_survives_restart_with_file_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("sessions");
    let client = browser();

    {
        let server = TestServer::start_with(SaveHandlerKind::Files, &save_path, &[]).await;
        add_to_cart(&client, &server, 1, "2").await;
        assert_eq!(session_files(&save_path).len(), 1);
    }

    // The cookie is scoped to the host, so a new server on another port
    // still receives it.
    let server = TestServer::start_with(SaveHandlerKind::Files, &save_path, &[]).await;
    let cart = load_cart(&client, &server).await;

    assert_eq!(cart["summary_count"], 2);
    assert_eq!(cart["items"][0]["name"], "Joust Duffle Bag");
}

#[tokio::test]
async fn test_reading_empty_cart_creates_no_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("sessions");
    let server = TestServer::start_with(SaveHandlerKind::Files, &save_path, &[]).await;

    let cart = load_cart(&browser(), &server).await;

    assert_eq!(cart["summary_count"], 0);
    assert!(session_files(&save_path).is_empty());
}

#[tokio::test]
async fn test_sessions_are_isolated_per_client() {
    let server = TestServer::start().await;
    let alice = browser();
    let bob = browser();

    add_to_cart(&alice, &server, 1, "1").await;

    assert_eq!(load_cart(&alice, &server).await["summary_count"], 1);
    assert_eq!(load_cart(&bob, &server).await["summary_count"], 0);
}
