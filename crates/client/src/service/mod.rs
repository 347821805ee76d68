//! The cart service seam.
//!
//! [`CartService`] is the contract the client depends on; [`HttpCartService`]
//! is the production implementation. Responses come back decoded but
//! uninterpreted: deciding whether a 2xx body is a logical failure is the
//! client's job.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use storecart_core::PendingAction;
use storecart_core::wire::{AddResponse, DeleteResponse, UpdateResponse};
use thiserror::Error;

pub use http::HttpCartService;

/// A request to the cart service did not produce a usable response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Service returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        /// `error` field decoded from the body, if any.
        message: Option<String>,
    },

    /// A 2xx body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl TransportError {
    /// Message supplied by the service, if one could be decoded.
    #[must_use]
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}

/// The three mutations the cart service accepts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartService: Send + Sync {
    async fn add(&self, action: &PendingAction) -> Result<AddResponse, TransportError>;

    async fn update(&self, action: &PendingAction) -> Result<UpdateResponse, TransportError>;

    async fn delete(&self, action: &PendingAction) -> Result<DeleteResponse, TransportError>;
}

#[async_trait]
impl<T: CartService + ?Sized> CartService for Arc<T> {
    async fn add(&self, action: &PendingAction) -> Result<AddResponse, TransportError> {
        (**self).add(action).await
    }

    async fn update(&self, action: &PendingAction) -> Result<UpdateResponse, TransportError> {
        (**self).update(action).await
    }

    async fn delete(&self, action: &PendingAction) -> Result<DeleteResponse, TransportError> {
        (**self).delete(action).await
    }
}
