//! Storecart Core - Shared cart types library.
//!
//! This crate provides the types shared by every storecart component:
//! - `client` - The cart controller that talks to the cart service
//! - `cli` - Terminal front end for the cart controller
//!
//! # Architecture
//!
//! The core crate contains only types and the wire format - no I/O, no HTTP
//! clients. Validation of shopper input lives here so it can run before any
//! request is built.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, quantities, action kinds, money, cart entities
//! - [`wire`] - Request forms and response bodies of the cart service
//! - [`error`] - Client-side validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod types;
pub mod wire;

pub use error::ValidationError;
pub use types::*;
