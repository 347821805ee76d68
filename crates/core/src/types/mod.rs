//! Core types for storecart.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod action;
pub mod cart;
pub mod id;
pub mod money;
pub mod quantity;

pub use action::ActionKind;
pub use cart::{CartLine, CartSummary, PendingAction};
pub use id::*;
pub use money::{CurrencyCode, Money};
pub use quantity::RequestedQuantity;
