//! Error taxonomy of the cart client.
//!
//! By the time a handler returns one of these the page has already been
//! told (alert shown, control restored); the value is for callers and logs.

use storecart_core::{ControlId, ValidationError};
use thiserror::Error;

use crate::service::TransportError;

/// Why a cart action did not complete.
#[derive(Debug, Error)]
pub enum CartError {
    /// Input read from the control was rejected; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The service answered but reported a logical failure.
    #[error("Service error: {0}")]
    Service(String),

    /// The request itself failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The control already has a request in flight; the click was ignored.
    #[error("Control {0} is busy")]
    Busy(ControlId),
}

impl CartError {
    /// Whether a request reached the service.
    #[must_use]
    pub const fn was_dispatched(&self) -> bool {
        matches!(self, Self::Service(_) | Self::Transport(_))
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::Service("out of stock".to_string());
        assert_eq!(err.to_string(), "Service error: out of stock");

        let err = CartError::Validation(ValidationError::MissingProductId);
        assert_eq!(err.to_string(), "Validation error: product id is missing");
    }

    #[test]
    fn test_was_dispatched() {
        assert!(!CartError::Validation(ValidationError::MissingAction).was_dispatched());
        assert!(!CartError::Busy(ControlId::new("add-1")).was_dispatched());
        assert!(CartError::Service("nope".to_string()).was_dispatched());
        assert!(
            CartError::Transport(TransportError::Status {
                status: 500,
                message: None,
            })
            .was_dispatched()
        );
    }
}
