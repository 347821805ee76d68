//! Client-side validation errors.
//!
//! These are raised before any request leaves the client.

use thiserror::Error;

/// Input read from a control failed validation; nothing was dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The control carried no product identifier, or an empty one.
    #[error("product id is missing")]
    MissingProductId,

    /// The quantity input is not a number, or is below 1.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// The control carried no action, or an empty one.
    #[error("action is missing")]
    MissingAction,
}
