//! The page the cart client reconciles against.
//!
//! Implementations wrap whatever renders the cart: a browser DOM binding, a
//! terminal, or the recorder in [`crate::testing`]. Every method is
//! infallible; an implementation silently skips anchors it does not have
//! (no quantity badge, no row around the control, ...).
//!
//! Row-scoped methods take the control that was clicked; the page resolves
//! the enclosing row itself.

use std::sync::Arc;

use storecart_core::{ControlId, Money};

pub trait CartPage: Send + Sync {
    /// Current label of a control, if it has one.
    fn control_label(&self, control: &ControlId) -> Option<String>;

    fn set_control_label(&self, control: &ControlId, label: &str);

    fn set_control_enabled(&self, control: &ControlId, enabled: bool);

    /// Toggle the loading indicator on a control.
    fn set_control_loading(&self, control: &ControlId, loading: bool);

    /// Write the cart-wide quantity into the `cart_quantity` anchor.
    fn set_cart_quantity(&self, quantity: u64);

    /// Write the quantity text of the row enclosing `control`.
    fn set_line_quantity(&self, control: &ControlId, quantity: i64);

    /// Write the line-total text of the row enclosing `control`.
    fn set_line_total(&self, control: &ControlId, total: &Money);

    /// Remove the row enclosing `control` from view.
    fn remove_line(&self, control: &ControlId);

    /// Write the page-wide cart total.
    fn set_cart_total(&self, total: &Money);

    /// Show a blocking message to the shopper.
    fn alert(&self, message: &str);

    /// Re-render the whole page from the server.
    fn reload(&self);
}

impl<T: CartPage + ?Sized> CartPage for Arc<T> {
    fn control_label(&self, control: &ControlId) -> Option<String> {
        (**self).control_label(control)
    }

    fn set_control_label(&self, control: &ControlId, label: &str) {
        (**self).set_control_label(control, label);
    }

    fn set_control_enabled(&self, control: &ControlId, enabled: bool) {
        (**self).set_control_enabled(control, enabled);
    }

    fn set_control_loading(&self, control: &ControlId, loading: bool) {
        (**self).set_control_loading(control, loading);
    }

    fn set_cart_quantity(&self, quantity: u64) {
        (**self).set_cart_quantity(quantity);
    }

    fn set_line_quantity(&self, control: &ControlId, quantity: i64) {
        (**self).set_line_quantity(control, quantity);
    }

    fn set_line_total(&self, control: &ControlId, total: &Money) {
        (**self).set_line_total(control, total);
    }

    fn remove_line(&self, control: &ControlId) {
        (**self).remove_line(control);
    }

    fn set_cart_total(&self, total: &Money) {
        (**self).set_cart_total(total);
    }

    fn alert(&self, message: &str) {
        (**self).alert(message);
    }

    fn reload(&self) {
        (**self).reload();
    }
}
