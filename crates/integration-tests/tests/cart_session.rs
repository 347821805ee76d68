//! Integration tests for session handling, CSRF placement, and request ordering.
//!
//! Run with: cargo test -p storecart-integration-tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use storecart_client::testing::RecordingPage;
use storecart_client::{
    CartClientConfig, CartEndpoints, CartError, ClickEvent, CsrfPlacement, CsrfPlacements,
    DispatchMode,
};
use storecart_core::ControlId;
use storecart_integration_tests::{
    Endpoint, STUB_CSRF_TOKEN, STUB_SESSION_COOKIE, StubCartService, client_for,
};

// ============================================================================
// Session & CSRF
// ============================================================================

#[tokio::test]
async fn test_session_cookie_is_sent_on_later_requests() {
    let stub = StubCartService::spawn().await;
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    client
        .on_click(ClickEvent::add("add-42", Some("42"), None))
        .await
        .expect("Add should succeed");
    client
        .on_click(ClickEvent::delete("del-42", Some("42"), Some("remove")))
        .await
        .expect("Delete should succeed");

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].cookie, None);
    assert_eq!(requests[1].cookie.as_deref(), Some(STUB_SESSION_COOKIE));
}

#[tokio::test]
async fn test_csrf_placement_is_configurable_per_endpoint() {
    let stub = StubCartService::spawn().await;
    let config = stub.config().with_csrf_placements(CsrfPlacements {
        add: CsrfPlacement::Header,
        update: CsrfPlacement::FormField,
        delete: CsrfPlacement::FormField,
    });
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&config, &page);

    client
        .on_click(ClickEvent::add("add-42", Some("42"), None))
        .await
        .expect("Add should succeed");
    client
        .on_click(ClickEvent::delete("del-42", Some("42"), Some("remove")))
        .await
        .expect("Delete should succeed");

    let adds = stub.requests_to(Endpoint::Add);
    let add = &adds[0];
    assert_eq!(add.csrf_header.as_deref(), Some(STUB_CSRF_TOKEN));
    assert_eq!(add.field("csrfmiddlewaretoken"), None);

    let deletes = stub.requests_to(Endpoint::Delete);
    let delete = &deletes[0];
    assert_eq!(delete.csrf_header, None);
    assert_eq!(delete.field("csrfmiddlewaretoken"), Some(STUB_CSRF_TOKEN));
}

#[tokio::test]
async fn test_csrf_token_is_read_per_request() {
    let stub = StubCartService::spawn().await;
    let issued = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&issued);
    let provider = move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        SecretString::from(format!("rotating-token-{n}"))
    };
    let config = CartClientConfig::new(
        CartEndpoints::with_default_paths(&stub.base_url()).expect("Valid endpoints"),
        Arc::new(provider),
    );
    let page = Arc::new(RecordingPage::new());
    let client = client_for(&config, &page);

    for _ in 0..2 {
        client
            .on_click(ClickEvent::update("inc-3", Some("3"), Some("increment")))
            .await
            .expect("Update should succeed");
    }

    let tokens: Vec<_> = stub
        .requests_to(Endpoint::Update)
        .iter()
        .map(|r| r.field("csrfmiddlewaretoken").map(str::to_owned))
        .collect();
    assert_eq!(
        tokens,
        vec![
            Some("rotating-token-0".to_string()),
            Some("rotating-token-1".to_string()),
        ]
    );
    assert_eq!(issued.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test]
async fn test_request_timeout_surfaces_as_transport_error() {
    let stub = StubCartService::spawn().await;
    stub.delay_responses(Duration::from_millis(500));
    let config = stub
        .config()
        .with_request_timeout(Duration::from_millis(100));
    let control = ControlId::new("add-42");
    let page = Arc::new(RecordingPage::new().with_control("add-42", "Add to Cart"));
    let client = stub.client(&config, &page);

    let err = client
        .handle_add(&control, Some("42"), None)
        .await
        .expect_err("Add should time out");

    assert!(matches!(err, CartError::Transport(_)));
    assert_eq!(
        page.alerts(),
        vec!["Failed to add to cart: Unknown error".to_string()]
    );
    assert!(page.is_enabled(&control));
    assert_eq!(page.label(&control).as_deref(), Some("Add to Cart"));
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_busy_control_sends_one_request() {
    let stub = StubCartService::spawn().await;
    stub.delay_responses(Duration::from_millis(100));
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);
    let control = ControlId::new("add-42");

    let (first, second) = tokio::join!(
        client.handle_add(&control, Some("42"), None),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            client.handle_add(&control, Some("42"), None).await
        }
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(CartError::Busy(_))));
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn test_concurrent_mode_overlaps_requests() {
    let delay = Duration::from_millis(100);
    let stub = StubCartService::spawn().await;
    stub.delay_responses(delay);
    let page = Arc::new(RecordingPage::new());
    let client = stub.client(&stub.config(), &page);

    let (a, b) = tokio::join!(
        client.on_click(ClickEvent::add("add-1", Some("1"), None)),
        client.on_click(ClickEvent::add("add-2", Some("2"), None)),
    );
    assert!(a.is_ok() && b.is_ok());

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    let gap = requests[1].received_at - requests[0].received_at;
    assert!(gap < delay, "requests should overlap, gap was {gap:?}");
}

#[tokio::test]
async fn test_serialized_mode_waits_for_previous_request() {
    let delay = Duration::from_millis(100);
    let stub = StubCartService::spawn().await;
    stub.delay_responses(delay);
    stub.respond(Endpoint::Add, 200, json!({ "qty": 1 }));
    stub.respond(Endpoint::Add, 200, json!({ "qty": 2 }));
    let config = stub.config().with_dispatch_mode(DispatchMode::Serialized);
    let page = Arc::new(RecordingPage::new().with_quantity_anchor());
    let client = stub.client(&config, &page);

    let (a, b) = tokio::join!(
        client.on_click(ClickEvent::add("add-1", Some("1"), None)),
        client.on_click(ClickEvent::add("add-2", Some("2"), None)),
    );
    assert!(a.is_ok() && b.is_ok());

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].field("product_id"), Some("1"));
    let gap = requests[1].received_at - requests[0].received_at;
    assert!(gap >= delay, "second request went out early, gap was {gap:?}");
    assert_eq!(page.cart_quantity(), Some(2));
}
