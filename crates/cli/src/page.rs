//! A [`CartPage`] that renders to the terminal.
//!
//! Alerts go to stdout; every other page change is logged. There is no page
//! to reload, so a reload is only logged.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use storecart_client::CartPage;
use storecart_core::{ControlId, Money};

#[derive(Debug, Default)]
pub struct TerminalPage {
    labels: Mutex<HashMap<ControlId, String>>,
}

impl TerminalPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the final outcome of a command.
    #[allow(clippy::print_stdout)]
    pub fn report(&self, line: &str) {
        println!("{line}");
    }
}

impl CartPage for TerminalPage {
    fn control_label(&self, control: &ControlId) -> Option<String> {
        self.labels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(control)
            .cloned()
    }

    fn set_control_label(&self, control: &ControlId, label: &str) {
        tracing::debug!(%control, label, "Control label");
        self.labels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(control.clone(), label.to_owned());
    }

    fn set_control_enabled(&self, control: &ControlId, enabled: bool) {
        tracing::debug!(%control, enabled, "Control state");
    }

    fn set_control_loading(&self, control: &ControlId, loading: bool) {
        tracing::debug!(%control, loading, "Control loading");
    }

    fn set_cart_quantity(&self, quantity: u64) {
        tracing::info!(quantity, "Cart quantity");
    }

    fn set_line_quantity(&self, control: &ControlId, quantity: i64) {
        tracing::info!(%control, quantity, "Line quantity");
    }

    fn set_line_total(&self, control: &ControlId, total: &Money) {
        tracing::info!(%control, %total, "Line total");
    }

    fn remove_line(&self, control: &ControlId) {
        tracing::info!(%control, "Line removed");
    }

    fn set_cart_total(&self, total: &Money) {
        tracing::info!(%total, "Cart total");
    }

    #[allow(clippy::print_stdout)]
    fn alert(&self, message: &str) {
        println!("{message}");
    }

    fn reload(&self) {
        tracing::info!("Page reload requested");
    }
}
