//! Cart service client over HTTP.
//!
//! Every mutation is a same-origin form POST answered with JSON. The session
//! cookie is kept across requests so the server-side cart persists for the
//! life of the client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use storecart_core::PendingAction;
use storecart_core::wire::{
    ACTION_POST, AddForm, AddResponse, CSRF_HEADER, DeleteForm, DeleteResponse, ErrorBody,
    UpdateForm, UpdateResponse,
};
use tracing::instrument;
use url::Url;

use super::{CartService, TransportError};
use crate::config::{
    CartClientConfig, CartEndpoints, CsrfPlacement, CsrfPlacements, CsrfTokenProvider,
};

/// Cart service client.
#[derive(Clone)]
pub struct HttpCartService {
    client: reqwest::Client,
    endpoints: CartEndpoints,
    csrf: Arc<dyn CsrfTokenProvider>,
    placements: CsrfPlacements,
}

impl std::fmt::Debug for HttpCartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCartService")
            .field("endpoints", &self.endpoints)
            .field("placements", &self.placements)
            .finish_non_exhaustive()
    }
}

impl HttpCartService {
    /// Create a new cart service client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CartClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Marks the request as AJAX for frameworks that branch on it
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoints: config.endpoints.clone(),
            csrf: Arc::clone(&config.csrf_token_provider),
            placements: config.csrf_placements,
        })
    }

    /// Post a form and decode the JSON answer.
    ///
    /// Non-2xx answers become [`TransportError::Status`] carrying the body's
    /// `error` field when it decodes.
    async fn post<F, R>(
        &self,
        url: &Url,
        form: &F,
        csrf_header: Option<&str>,
    ) -> Result<R, TransportError>
    where
        F: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(url.clone()).form(form);
        if let Some(token) = csrf_header {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            tracing::debug!(status = status.as_u16(), ?message, "cart service rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| {
            if e.is_decode() {
                TransportError::Parse(e.to_string())
            } else {
                TransportError::Http(e)
            }
        })
    }
}

/// Split the token between form field and header according to placement.
fn csrf_slots(placement: CsrfPlacement, token: &str) -> (Option<&str>, Option<&str>) {
    match placement {
        CsrfPlacement::FormField => (Some(token), None),
        CsrfPlacement::Header => (None, Some(token)),
    }
}

#[async_trait]
impl CartService for HttpCartService {
    #[instrument(skip(self, action), fields(product_id = %action.product_id))]
    async fn add(&self, action: &PendingAction) -> Result<AddResponse, TransportError> {
        let token = self.csrf.csrf_token();
        let (field, header) = csrf_slots(self.placements.add, token.expose_secret());
        let quantity = action.quantity_or_default();

        let form = AddForm {
            product_id: action.product_id.as_str(),
            product_qty: quantity.as_str(),
            csrfmiddlewaretoken: field,
            action: ACTION_POST,
        };

        self.post(&self.endpoints.add_url, &form, header).await
    }

    #[instrument(skip(self, action), fields(product_id = %action.product_id, action = %action.kind))]
    async fn update(&self, action: &PendingAction) -> Result<UpdateResponse, TransportError> {
        let token = self.csrf.csrf_token();
        let (field, header) = csrf_slots(self.placements.update, token.expose_secret());

        let form = UpdateForm {
            product_id: action.product_id.as_str(),
            action_type: action.kind.as_str(),
            csrfmiddlewaretoken: field,
            action: ACTION_POST,
        };

        self.post(&self.endpoints.update_url, &form, header).await
    }

    #[instrument(skip(self, action), fields(product_id = %action.product_id, action = %action.kind))]
    async fn delete(&self, action: &PendingAction) -> Result<DeleteResponse, TransportError> {
        let token = self.csrf.csrf_token();
        let (field, header) = csrf_slots(self.placements.delete, token.expose_secret());

        let form = DeleteForm {
            product_id: action.product_id.as_str(),
            action: action.kind.as_str(),
            csrfmiddlewaretoken: field,
        };

        self.post(&self.endpoints.delete_url, &form, header).await
    }
}
