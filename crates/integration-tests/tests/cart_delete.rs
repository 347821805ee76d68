//! Integration tests for removing cart lines over HTTP.
//!
//! Run with: cargo test -p storecart-integration-tests

use std::sync::Arc;

use serde_json::json;
use storecart_client::testing::RecordingPage;
use storecart_client::{CartError, ClickEvent};
use storecart_core::ControlId;
use storecart_integration_tests::{
    Endpoint, STUB_CSRF_TOKEN, StubCartService, client_for, config_for, unreachable_base_url,
};

#[tokio::test]
async fn test_delete_sends_csrf_header_and_reloads() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    client
        .on_click(ClickEvent::delete("del-7", Some("7"), Some("remove")))
        .await
        .expect("Delete should succeed");

    let requests = stub.requests_to(Endpoint::Delete);
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.field("product_id"), Some("7"));
    assert_eq!(request.field("action"), Some("remove"));
    assert_eq!(request.field("csrfmiddlewaretoken"), None);
    assert_eq!(request.csrf_header.as_deref(), Some(STUB_CSRF_TOKEN));
    assert_eq!(page.reloads(), 1);
}

#[tokio::test]
async fn test_delete_reported_failure_keeps_page() {
    let stub = StubCartService::spawn().await;
    stub.respond(
        Endpoint::Delete,
        200,
        json!({ "success": false, "error": "out of stock" }),
    );
    let control = ControlId::new("del-7");
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    let err = client
        .handle_delete(&control, Some("7"), Some("remove"))
        .await
        .expect_err("Delete should fail");

    assert!(matches!(err, CartError::Service(_)));
    assert_eq!(page.alerts(), vec!["out of stock".to_string()]);
    assert_eq!(page.reloads(), 0);
    assert!(page.is_enabled(&control));
    assert!(!page.is_loading(&control));
}

#[tokio::test]
async fn test_delete_missing_item_shows_service_message() {
    let stub = StubCartService::spawn().await;
    stub.respond(
        Endpoint::Delete,
        404,
        json!({ "error": "Item not found in cart" }),
    );
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    let _ = client
        .on_click(ClickEvent::delete("del-7", Some("7"), Some("remove")))
        .await;

    assert_eq!(page.alerts(), vec!["Item not found in cart".to_string()]);
    assert_eq!(page.reloads(), 0);
}

#[tokio::test]
async fn test_delete_unreachable_service_uses_retry_message() {
    let config = config_for(&unreachable_base_url());
    let page = Arc::new(RecordingPage::new());
    let client = client_for(&config, &page);

    let err = client
        .on_click(ClickEvent::delete("del-7", Some("7"), Some("remove")))
        .await
        .expect_err("Delete should fail");

    assert!(matches!(err, CartError::Transport(_)));
    assert_eq!(
        page.alerts(),
        vec!["An error occurred. Please try again.".to_string()]
    );
}

#[tokio::test]
async fn test_delete_without_action_is_not_sent() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    let err = client
        .on_click(ClickEvent::delete("del-7", Some("7"), None))
        .await
        .expect_err("Missing action should be rejected");

    assert!(matches!(err, CartError::Validation(_)));
    assert!(stub.requests().is_empty());
    assert_eq!(page.alerts(), vec!["Invalid product or action.".to_string()]);
}
