//! Integration tests for adding to the cart over HTTP.
//!
//! Run with: cargo test -p storecart-integration-tests

use std::sync::Arc;

use serde_json::json;
use storecart_client::testing::RecordingPage;
use storecart_client::{CartError, ClickEvent, Reconciliation, TransportError};
use storecart_core::ControlId;
use storecart_integration_tests::{Endpoint, STUB_CSRF_TOKEN, StubCartService};

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_add_posts_form_with_csrf_field() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new().with_quantity_anchor());
    let client = stub.client(&stub.config(), &page);

    client
        .on_click(ClickEvent::add("add-42", Some("42"), Some("2")))
        .await
        .expect("Add should succeed");

    let requests = stub.requests_to(Endpoint::Add);
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.field("product_id"), Some("42"));
    assert_eq!(request.field("product_qty"), Some("2"));
    assert_eq!(request.field("action"), Some("post"));
    assert_eq!(request.field("csrfmiddlewaretoken"), Some(STUB_CSRF_TOKEN));
    assert_eq!(request.csrf_header, None);
    assert_eq!(request.requested_with.as_deref(), Some("XMLHttpRequest"));
}

#[tokio::test]
async fn test_add_forwards_trimmed_quantity_text() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    client
        .on_click(ClickEvent::add("add-42", Some("42"), Some(" 1.5 ")))
        .await
        .expect("Add should succeed");

    let requests = stub.requests_to(Endpoint::Add);
    assert_eq!(requests[0].field("product_qty"), Some("1.5"));
}

#[tokio::test]
async fn test_add_without_quantity_input_sends_one() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    client
        .on_click(ClickEvent::add("add-42", Some("42"), None))
        .await
        .expect("Add should succeed");

    assert_eq!(stub.requests()[0].field("product_qty"), Some("1"));
}

// ============================================================================
// Reconciliation
// ============================================================================

#[tokio::test]
async fn test_add_updates_quantity_anchor_and_confirms() {
    let stub = StubCartService::spawn().await;
    stub.respond(Endpoint::Add, 200, json!({ "qty": 5, "cart_total": 61.5 }));
    let control = ControlId::new("add-42");
    let page = Arc::new(
        RecordingPage::new()
            .with_control("add-42", "Add to Cart")
            .with_quantity_anchor(),
    );
    let client = stub.client(&stub.config(), &page);

    let result = client
        .handle_add(&control, Some("42"), Some("2"))
        .await
        .expect("Add should succeed");

    assert_eq!(page.cart_quantity(), Some(5));
    assert_eq!(page.alerts(), vec!["Product added to cart!".to_string()]);
    assert_eq!(page.label(&control).as_deref(), Some("Add to Cart"));
    assert!(page.is_enabled(&control));
    // The total is reported back but the add flow leaves the page total alone
    assert_eq!(page.cart_total(), None);

    let Reconciliation::Added { summary } = result else {
        panic!("Expected an add reconciliation");
    };
    assert_eq!(summary.total_quantity, Some(5));
    assert_eq!(
        summary.total_amount.map(|m| m.to_string()).as_deref(),
        Some("$61.50")
    );
}

#[tokio::test]
async fn test_add_rejected_by_service_shows_its_message() {
    let stub = StubCartService::spawn().await;
    stub.respond(
        Endpoint::Add,
        400,
        json!({ "error": "Only 3 items available in stock" }),
    );
    let control = ControlId::new("add-42");
    let page = Arc::new(RecordingPage::new().with_control("add-42", "Add to Cart"));
    let client = stub.client(&stub.config(), &page);

    let err = client
        .handle_add(&control, Some("42"), Some("9"))
        .await
        .expect_err("Add should fail");

    assert!(matches!(err, CartError::Transport(_)));
    assert_eq!(
        page.alerts(),
        vec!["Failed to add to cart: Only 3 items available in stock".to_string()]
    );
    assert!(page.is_enabled(&control));
    assert_eq!(page.label(&control).as_deref(), Some("Add to Cart"));
}

#[tokio::test]
async fn test_add_server_error_without_body_uses_fallback() {
    let stub = StubCartService::spawn().await;
    stub.respond(Endpoint::Add, 500, json!("Internal Server Error"));
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    let _ = client
        .on_click(ClickEvent::add("add-42", Some("42"), None))
        .await;

    assert_eq!(
        page.alerts(),
        vec!["Failed to add to cart: Unknown error".to_string()]
    );
}

#[tokio::test]
async fn test_add_malformed_success_body_is_a_transport_error() {
    let stub = StubCartService::spawn().await;
    stub.respond(Endpoint::Add, 200, json!("added"));
    let control = ControlId::new("add-42");
    let page = Arc::new(
        RecordingPage::new()
            .with_control("add-42", "Add to Cart")
            .with_quantity_anchor(),
    );
    let client = stub.client(&stub.config(), &page);

    let err = client
        .handle_add(&control, Some("42"), None)
        .await
        .expect_err("Undecodable body should fail");

    assert!(matches!(
        err,
        CartError::Transport(TransportError::Parse(_))
    ));
    assert_eq!(page.cart_quantity(), None);
    assert_eq!(
        page.alerts(),
        vec!["Failed to add to cart: Unknown error".to_string()]
    );
    assert_eq!(page.label(&control).as_deref(), Some("Add to Cart"));
}

#[tokio::test]
async fn test_invalid_add_never_reaches_service() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    let err = client
        .on_click(ClickEvent::add("add-42", Some(""), Some("2")))
        .await
        .expect_err("Empty product id should be rejected");
    assert!(matches!(err, CartError::Validation(_)));

    let err = client
        .on_click(ClickEvent::add("add-42", Some("42"), Some("0")))
        .await
        .expect_err("Zero quantity should be rejected");
    assert!(matches!(err, CartError::Validation(_)));

    assert!(stub.requests().is_empty());
    assert_eq!(
        page.alerts(),
        vec![
            "Please select a valid product and quantity.".to_string(),
            "Please select a valid product and quantity.".to_string(),
        ]
    );
}
