//! Integration tests for storecart.
//!
//! The tests drive a real [`CartClient`] over HTTP against [`StubCartService`],
//! an in-process axum server bound to `127.0.0.1:0`. Nothing external needs
//! to be running.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storecart-integration-tests
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use secrecy::SecretString;
use serde_json::{Value, json};
use storecart_client::testing::RecordingPage;
use storecart_client::{
    CartClient, CartClientConfig, CartEndpoints, HttpCartService, StaticCsrfToken,
};
use storecart_core::wire::CSRF_HEADER;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use url::Url;

/// CSRF token every stub config carries.
pub const STUB_CSRF_TOKEN: &str = "kT9xq2LmW4vZr8Bn";

/// Session cookie the stub hands out on the first request.
pub const STUB_SESSION_COOKIE: &str = "sessionid=stub-session";

/// The client under test, wired to a stub and a recording page.
pub type StubClient = CartClient<HttpCartService, Arc<RecordingPage>>;

/// Which cart endpoint a request hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Add,
    Update,
    Delete,
}

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub endpoint: Endpoint,
    pub form: HashMap<String, String>,
    /// Value of the `X-CSRFToken` header.
    pub csrf_header: Option<String>,
    pub cookie: Option<String>,
    pub requested_with: Option<String>,
    pub received_at: Instant,
}

impl RecordedRequest {
    /// A form field's value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }
}

#[derive(Debug, Default)]
struct StubState {
    requests: Vec<RecordedRequest>,
    scripted: HashMap<Endpoint, VecDeque<(StatusCode, Value)>>,
    delay: Option<Duration>,
}

/// An in-process cart service with scripted answers.
///
/// Unscripted requests get a plain success body for their endpoint.
pub struct StubCartService {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
    server: JoinHandle<()>,
}

impl StubCartService {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(StubState::default()));

        let app = Router::new()
            .route(CartEndpoints::DEFAULT_ADD_PATH, post(add))
            .route(CartEndpoints::DEFAULT_UPDATE_PATH, post(update))
            .route(CartEndpoints::DEFAULT_DELETE_PATH, post(delete))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub cart service");
        let addr = listener
            .local_addr()
            .expect("Failed to read stub cart service address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Origin the stub is served from.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Stub address is a valid URL")
    }

    /// Client configuration pointing at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the default endpoint paths do not join onto the base URL.
    #[must_use]
    pub fn config(&self) -> CartClientConfig {
        config_for(&self.base_url())
    }

    /// Build a client for `config` over a fresh HTTP service and `page`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, config: &CartClientConfig, page: &Arc<RecordingPage>) -> StubClient {
        client_for(config, page)
    }

    /// Queue an answer for the next request to `endpoint`.
    pub fn respond(&self, endpoint: Endpoint, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state()
            .scripted
            .entry(endpoint)
            .or_default()
            .push_back((status, body));
    }

    /// Hold every answer back by `delay`.
    pub fn delay_responses(&self, delay: Duration) {
        self.state().delay = Some(delay);
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Requests received by one endpoint.
    #[must_use]
    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        lock(&self.state)
    }
}

impl Drop for StubCartService {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Client configuration for a store at `base`, carrying [`STUB_CSRF_TOKEN`].
///
/// # Panics
///
/// Panics if the default endpoint paths do not join onto `base`.
#[must_use]
pub fn config_for(base: &Url) -> CartClientConfig {
    let endpoints =
        CartEndpoints::with_default_paths(base).expect("Default cart paths are valid");
    CartClientConfig::new(
        endpoints,
        Arc::new(StaticCsrfToken::new(SecretString::from(STUB_CSRF_TOKEN))),
    )
}

/// Build a client for `config` over a fresh HTTP service and `page`.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client_for(config: &CartClientConfig, page: &Arc<RecordingPage>) -> StubClient {
    let service = HttpCartService::new(config).expect("Failed to create HTTP cart service");
    CartClient::new(service, Arc::clone(page), config)
}

/// A local URL nothing is listening on.
///
/// # Panics
///
/// Panics if no ephemeral port can be reserved.
#[must_use]
pub fn unreachable_base_url() -> Url {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to reserve a local port");
    let addr = listener.local_addr().expect("Failed to read reserved port");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("Reserved address is a valid URL")
}

fn lock(state: &Mutex<StubState>) -> MutexGuard<'_, StubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn header(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn default_body(endpoint: Endpoint) -> Value {
    match endpoint {
        Endpoint::Add => json!({ "qty": 1 }),
        Endpoint::Update => json!({ "success": true }),
        Endpoint::Delete => json!({ "success": true }),
    }
}

async fn answer(
    state: &Mutex<StubState>,
    endpoint: Endpoint,
    headers: &HeaderMap,
    form: HashMap<String, String>,
) -> Response {
    let cookie = header(headers, COOKIE);
    let (delay, (status, body)) = {
        let mut state = lock(state);
        state.requests.push(RecordedRequest {
            endpoint,
            form,
            csrf_header: header(headers, CSRF_HEADER),
            cookie: cookie.clone(),
            requested_with: header(headers, "x-requested-with"),
            received_at: Instant::now(),
        });
        let scripted = state
            .scripted
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| (StatusCode::OK, default_body(endpoint)));
        (state.delay, scripted)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = (status, axum::Json(body)).into_response();
    if cookie.is_none() {
        response.headers_mut().insert(
            SET_COOKIE,
            HeaderValue::from_static("sessionid=stub-session; Path=/"),
        );
    }
    response
}

async fn add(
    State(state): State<Arc<Mutex<StubState>>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    answer(&state, Endpoint::Add, &headers, form).await
}

async fn update(
    State(state): State<Arc<Mutex<StubState>>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    answer(&state, Endpoint::Update, &headers, form).await
}

async fn delete(
    State(state): State<Arc<Mutex<StubState>>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    answer(&state, Endpoint::Delete, &headers, form).await
}
