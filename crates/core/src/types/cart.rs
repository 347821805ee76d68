//! Cart entities as seen by the client.
//!
//! All of these are transient: lines live in the page, summaries come from
//! the cart service, and pending actions exist only while a request is out.

use serde::{Deserialize, Serialize};

use super::{ActionKind, Money, ProductId, RequestedQuantity};

/// One product row in the rendered cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u64,
    pub line_total: Option<Money>,
}

impl CartLine {
    /// Create a line.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u64, line_total: Option<Money>) -> Self {
        Self {
            product_id,
            quantity,
            line_total,
        }
    }

    /// Apply a quantity reported by the cart service.
    ///
    /// Negative values clamp to zero. Returns `true` when the line is now
    /// empty and must be removed from view.
    pub fn apply_quantity(&mut self, reported: i64) -> bool {
        self.quantity = u64::try_from(reported).unwrap_or(0);
        self.quantity == 0
    }
}

/// Aggregate cart state mirrored from a service response.
///
/// Fields are optional because not every endpoint reports both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    pub total_quantity: Option<u64>,
    pub total_amount: Option<Money>,
}

/// A single mutation built from one click and dropped once it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub product_id: ProductId,
    pub kind: ActionKind,
    /// Only set for [`ActionKind::Add`].
    pub quantity: Option<RequestedQuantity>,
}

impl PendingAction {
    /// Add `quantity` units of a product.
    #[must_use]
    pub const fn add(product_id: ProductId, quantity: RequestedQuantity) -> Self {
        Self {
            product_id,
            kind: ActionKind::Add,
            quantity: Some(quantity),
        }
    }

    /// Step a line's quantity up or down.
    #[must_use]
    pub const fn update(product_id: ProductId, kind: ActionKind) -> Self {
        Self {
            product_id,
            kind,
            quantity: None,
        }
    }

    /// Remove a line.
    #[must_use]
    pub const fn delete(product_id: ProductId, kind: ActionKind) -> Self {
        Self {
            product_id,
            kind,
            quantity: None,
        }
    }

    /// The quantity to send, falling back to the default of 1.
    #[must_use]
    pub fn quantity_or_default(&self) -> RequestedQuantity {
        self.quantity.clone().unwrap_or_default()
    }
}
