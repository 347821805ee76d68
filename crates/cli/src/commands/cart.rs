//! Cart commands.
//!
//! Each command is one click on a cart control of a [`TerminalPage`], routed
//! through the same [`CartClient`] a browser binding would use.

use std::sync::Arc;

use storecart_client::{
    CartClient, CartClientConfig, CartError, ClickEvent, ConfigError, HttpCartService,
    Reconciliation, TransportError,
};
use storecart_core::CartSummary;
use thiserror::Error;

use crate::page::TerminalPage;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Environment is missing or holds a bad value.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built.
    #[error("Client setup error: {0}")]
    Setup(#[from] TransportError),

    /// The cart action failed. The page has already shown the reason.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A click to perform.
#[derive(Debug, Clone)]
pub enum Click {
    Add { product: String, qty: Option<String> },
    Update { product: String, action: String },
    Delete { product: String, action: String },
}

impl Click {
    fn into_event(self) -> ClickEvent {
        match self {
            Self::Add { product, qty } => {
                ClickEvent::add("add-cart", Some(&product), qty.as_deref())
            }
            Self::Update { product, action } => {
                ClickEvent::update("update-cart", Some(&product), Some(&action))
            }
            Self::Delete { product, action } => {
                ClickEvent::delete("delete-cart", Some(&product), Some(&action))
            }
        }
    }
}

/// Load configuration from the environment and perform one click.
///
/// # Errors
///
/// Returns error if configuration is invalid or the cart action fails.
pub async fn run(click: Click) -> Result<(), CartCommandError> {
    let config = CartClientConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let service = HttpCartService::new(&config)?;
    let page = Arc::new(TerminalPage::new());
    let client = CartClient::new(service, Arc::clone(&page), &config);

    let reconciliation = client
        .on_click(click.into_event())
        .await
        .inspect_err(|e| {
            if !e.was_dispatched() {
                tracing::info!("Nothing was sent to the cart service");
            }
        })?;
    page.report(&outcome(&reconciliation));
    Ok(())
}

/// One-line summary of what changed.
fn outcome(reconciliation: &Reconciliation) -> String {
    match reconciliation {
        Reconciliation::Added { summary } => format!("Added. {}", describe(summary)),
        Reconciliation::Updated {
            summary,
            row_removed: true,
            ..
        } => format!("Line removed. {}", describe(summary)),
        Reconciliation::Updated {
            summary,
            item_quantity,
            ..
        } => match item_quantity {
            Some(quantity) => format!("Line now holds {quantity}. {}", describe(summary)),
            None => format!("Updated. {}", describe(summary)),
        },
        Reconciliation::Deleted { summary } => format!("Removed. {}", describe(summary)),
    }
}

fn describe(summary: &CartSummary) -> String {
    match (summary.total_quantity, summary.total_amount) {
        (Some(quantity), Some(amount)) => format!("Cart: {quantity} item(s), {amount}"),
        (Some(quantity), None) => format!("Cart: {quantity} item(s)"),
        (None, Some(amount)) => format!("Cart total: {amount}"),
        (None, None) => "Cart totals not reported".to_string(),
    }
}
