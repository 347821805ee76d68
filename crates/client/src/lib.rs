//! Storecart Client - Cart controller for storefront pages.
//!
//! Turns clicks on cart controls into mutations against the cart service and
//! patches the page with whatever the service reports back.
//!
//! # Architecture
//!
//! - [`CartClient`] owns the click → validate → dispatch → reconcile pipeline
//! - [`CartPage`] abstracts the page (DOM, terminal, or test recorder)
//! - [`CartService`] abstracts the cart service; [`HttpCartService`] talks to
//!   it over form posts with CSRF protection
//! - [`CartClientConfig`] carries endpoints, the CSRF token provider, and
//!   user-facing messages
//!
//! # Example
//!
//! ```rust,ignore
//! let config = CartClientConfig::from_env()?;
//! let service = HttpCartService::new(&config)?;
//! let client = CartClient::new(service, page, &config);
//!
//! client.on_click(event).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod controls;
pub mod error;
pub mod page;
pub mod service;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{CartClient, Reconciliation};
pub use config::{
    CartClientConfig, CartEndpoints, ConfigError, CsrfPlacement, CsrfPlacements,
    CsrfTokenProvider, DispatchMode, Messages, StaticCsrfToken,
};
pub use controls::{ClickEvent, ControlClass, ControlData};
pub use error::CartError;
pub use page::CartPage;
pub use service::{CartService, HttpCartService, TransportError};
