//! The cart controller.
//!
//! Each handler runs the same pipeline: claim the control, validate what was
//! read off it, lock the control while the request is out, then reconcile the
//! page with the response. Validation happens before the first `.await`, so a
//! rejected click never touches the network.
//!
//! Handlers surface every outcome to the shopper through [`CartPage`] before
//! returning; the `Result` they hand back is for callers and logs.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use storecart_core::{
    ActionKind, CartSummary, ControlId, CurrencyCode, Money, PendingAction, ProductId,
    RequestedQuantity, ValidationError,
};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use tracing::instrument;

use crate::config::{CartClientConfig, DispatchMode, Messages};
use crate::controls::{ClickEvent, ControlClass};
use crate::error::{CartError, Result};
use crate::page::CartPage;
use crate::service::CartService;

/// What a successful action changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Added {
        summary: CartSummary,
    },
    Updated {
        summary: CartSummary,
        item_quantity: Option<i64>,
        row_removed: bool,
    },
    /// The page was reloaded.
    Deleted {
        summary: CartSummary,
    },
}

/// Binds cart controls to the cart service.
///
/// Share it behind an `Arc` when clicks are handled from several tasks.
pub struct CartClient<S, P> {
    service: S,
    page: P,
    messages: Messages,
    currency: CurrencyCode,
    dispatch_mode: DispatchMode,
    /// Controls with a request in flight. A disabled control cannot be
    /// clicked, so a click on one of these is dropped.
    in_flight: Mutex<HashSet<ControlId>>,
    /// Held across request and reconciliation in serialized mode.
    dispatch_queue: AsyncMutex<()>,
}

impl<S, P> std::fmt::Debug for CartClient<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartClient")
            .field("currency", &self.currency)
            .field("dispatch_mode", &self.dispatch_mode)
            .finish_non_exhaustive()
    }
}

/// Releases a control's in-flight claim when dropped.
struct InFlight<'a> {
    controls: &'a Mutex<HashSet<ControlId>>,
    control: ControlId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.controls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.control);
    }
}

/// Puts a locked control back the way it was found when dropped, including
/// when the handler future is dropped mid-request.
struct ControlLock<'a, P: CartPage> {
    page: &'a P,
    control: &'a ControlId,
    restore_label: Option<String>,
    loading: bool,
}

impl<P: CartPage> Drop for ControlLock<'_, P> {
    fn drop(&mut self) {
        if self.loading {
            self.page.set_control_loading(self.control, false);
        }
        self.page.set_control_enabled(self.control, true);
        if let Some(label) = &self.restore_label {
            self.page.set_control_label(self.control, label);
        }
    }
}

impl<S: CartService, P: CartPage> CartClient<S, P> {
    /// Create a cart client over a service and a page.
    #[must_use]
    pub fn new(service: S, page: P, config: &CartClientConfig) -> Self {
        Self {
            service,
            page,
            messages: config.messages.clone(),
            currency: config.currency,
            dispatch_mode: config.dispatch_mode,
            in_flight: Mutex::new(HashSet::new()),
            dispatch_queue: AsyncMutex::new(()),
        }
    }

    /// The page this client reconciles.
    pub const fn page(&self) -> &P {
        &self.page
    }

    /// Route a click to the handler for its control class.
    ///
    /// # Errors
    ///
    /// See [`Self::handle_add`], [`Self::handle_update`], [`Self::handle_delete`].
    pub async fn on_click(&self, event: ClickEvent) -> Result<Reconciliation> {
        let ClickEvent {
            control,
            class,
            data,
        } = event;

        match class {
            ControlClass::AddCart => {
                self.handle_add(&control, data.value.as_deref(), data.quantity_input.as_deref())
                    .await
            }
            ControlClass::UpdateCart => {
                self.handle_update(&control, data.product_id.as_deref(), data.action.as_deref())
                    .await
            }
            ControlClass::DeleteCart => {
                self.handle_delete(&control, data.product_id.as_deref(), data.action.as_deref())
                    .await
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// `quantity_input` is `None` when the page has no quantity input, in
    /// which case one unit is added.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`] if the product id is empty or the quantity
    ///   is not a number of at least 1; nothing is sent.
    /// - [`CartError::Service`] / [`CartError::Transport`] if the add failed.
    /// - [`CartError::Busy`] if this control already has a request in flight.
    #[instrument(skip(self, control), fields(control = %control))]
    pub async fn handle_add(
        &self,
        control: &ControlId,
        product_id: Option<&str>,
        quantity_input: Option<&str>,
    ) -> Result<Reconciliation> {
        let _claim = self.claim(control)?;

        let action = match validate_add(product_id, quantity_input) {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(error = %e, ?product_id, ?quantity_input, "Rejected add to cart");
                self.page.alert(&self.messages.add_invalid);
                return Err(e.into());
            }
        };

        let original_label = self
            .page
            .control_label(control)
            .unwrap_or_else(|| self.messages.add_label.clone());
        self.page.set_control_enabled(control, false);
        self.page.set_control_label(control, &self.messages.adding_label);
        let lock = ControlLock {
            page: &self.page,
            control,
            restore_label: Some(original_label),
            loading: false,
        };

        let _turn = self.dispatch_turn().await;
        tracing::debug!(product_id = %action.product_id, "Dispatching add to cart");
        let result = self.service.add(&action).await;
        drop(lock);

        match result {
            Ok(response) => {
                if let Some(message) = response.error.as_deref() {
                    self.report_failure(&self.messages.add_failure_prefix, message);
                    return Err(CartError::Service(message.to_string()));
                }

                if let Some(quantity) = response.qty {
                    self.page.set_cart_quantity(quantity);
                }
                self.page.alert(&self.messages.add_confirmation);

                let summary = response.summary(self.currency);
                tracing::info!(total_quantity = ?summary.total_quantity, "Added to cart");
                Ok(Reconciliation::Added { summary })
            }
            Err(e) => {
                let message = e
                    .service_message()
                    .unwrap_or(self.messages.unknown_error.as_str());
                self.report_failure(&self.messages.add_failure_prefix, message);
                Err(e.into())
            }
        }
    }

    /// Step a cart line up or down.
    ///
    /// Neither input is validated: a missing product id or action is sent as
    /// an empty string and left to the service to reject.
    ///
    /// # Errors
    ///
    /// - [`CartError::Service`] / [`CartError::Transport`] if the update failed.
    /// - [`CartError::Busy`] if this control already has a request in flight.
    #[instrument(skip(self, control), fields(control = %control))]
    pub async fn handle_update(
        &self,
        control: &ControlId,
        product_id: Option<&str>,
        action: Option<&str>,
    ) -> Result<Reconciliation> {
        let _claim = self.claim(control)?;

        if product_id.is_none() || action.is_none() {
            // TODO: validate like add/delete once the cart templates always render data-product-id
            tracing::warn!(?product_id, ?action, "Update control is missing data; sending anyway");
        }
        let action = PendingAction::update(
            ProductId::new(product_id.unwrap_or_default()),
            ActionKind::parse(action.unwrap_or_default()),
        );

        self.page.set_control_enabled(control, false);
        let lock = ControlLock {
            page: &self.page,
            control,
            restore_label: None,
            loading: false,
        };

        let _turn = self.dispatch_turn().await;
        tracing::debug!(product_id = %action.product_id, kind = %action.kind, "Dispatching cart update");
        let result = self.service.update(&action).await;
        drop(lock);

        let response = match result {
            Ok(response) if response.is_failure() => {
                let message = response
                    .error
                    .unwrap_or_else(|| self.messages.unknown_error.clone());
                self.report_failure(&self.messages.update_failure_prefix, &message);
                return Err(CartError::Service(message));
            }
            Ok(response) => response,
            Err(e) => {
                let message = e
                    .service_message()
                    .unwrap_or(self.messages.unknown_error.as_str());
                self.report_failure(&self.messages.update_failure_prefix, message);
                return Err(e.into());
            }
        };

        if let Some(quantity) = response.qty {
            self.page.set_cart_quantity(quantity);
        }
        if let Some(item_quantity) = response.item_quantity {
            self.page.set_line_quantity(control, item_quantity);
        }

        let summary = response.summary(self.currency);
        if let Some(total) = summary.total_amount {
            // Rows show the line subtotal when the service sends one, else
            // the cart total as the cart page has always done.
            let line_total = response
                .line_total
                .map_or(total, |amount| Money::new(amount, self.currency));
            self.page.set_line_total(control, &line_total);
            self.page.set_cart_total(&total);
        }

        let row_removed = response.item_quantity.is_some_and(|q| q <= 0);
        if row_removed {
            self.page.remove_line(control);
        }

        tracing::info!(item_quantity = ?response.item_quantity, row_removed, "Cart updated");
        self.page.reload();

        Ok(Reconciliation::Updated {
            summary,
            item_quantity: response.item_quantity,
            row_removed,
        })
    }

    /// Remove a line from the cart and reload the page.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`] if the product id or action is missing;
    ///   nothing is sent.
    /// - [`CartError::Service`] if the service answered without `success`.
    /// - [`CartError::Transport`] if the request failed.
    /// - [`CartError::Busy`] if this control already has a request in flight.
    #[instrument(skip(self, control), fields(control = %control))]
    pub async fn handle_delete(
        &self,
        control: &ControlId,
        product_id: Option<&str>,
        action: Option<&str>,
    ) -> Result<Reconciliation> {
        let _claim = self.claim(control)?;

        let action = match validate_delete(product_id, action) {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(error = %e, ?product_id, ?action, "Rejected cart delete");
                self.page.alert(&self.messages.delete_invalid);
                return Err(e.into());
            }
        };

        self.page.set_control_loading(control, true);
        self.page.set_control_enabled(control, false);
        let lock = ControlLock {
            page: &self.page,
            control,
            restore_label: None,
            loading: true,
        };

        let _turn = self.dispatch_turn().await;
        tracing::debug!(product_id = %action.product_id, "Dispatching cart delete");
        let result = self.service.delete(&action).await;
        drop(lock);

        match result {
            Ok(response) if !response.success => {
                let message = response
                    .error
                    .unwrap_or_else(|| self.messages.delete_failed.clone());
                self.report_failure("", &message);
                Err(CartError::Service(message))
            }
            Ok(response) => {
                tracing::info!(product_id = %action.product_id, "Removed from cart");
                self.page.reload();
                Ok(Reconciliation::Deleted {
                    summary: response.summary(self.currency),
                })
            }
            Err(e) => {
                let message = e
                    .service_message()
                    .unwrap_or(self.messages.delete_transport_failed.as_str());
                self.report_failure("", message);
                Err(e.into())
            }
        }
    }

    /// Mark a control as having a request in flight.
    fn claim(&self, control: &ControlId) -> Result<InFlight<'_>> {
        let mut controls = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !controls.insert(control.clone()) {
            tracing::debug!(%control, "Ignoring click on busy control");
            return Err(CartError::Busy(control.clone()));
        }

        Ok(InFlight {
            controls: &self.in_flight,
            control: control.clone(),
        })
    }

    /// Wait for this mutation's turn; a no-op in concurrent mode.
    async fn dispatch_turn(&self) -> Option<AsyncMutexGuard<'_, ()>> {
        match self.dispatch_mode {
            DispatchMode::Concurrent => None,
            DispatchMode::Serialized => Some(self.dispatch_queue.lock().await),
        }
    }

    /// Alert the shopper about a failed request.
    fn report_failure(&self, prefix: &str, message: &str) {
        tracing::warn!(%message, "Cart request failed");
        self.page.alert(&format!("{prefix}{message}"));
    }
}

fn validate_add(
    product_id: Option<&str>,
    quantity_input: Option<&str>,
) -> std::result::Result<PendingAction, ValidationError> {
    let product_id = ProductId::parse(product_id)?;
    let quantity = RequestedQuantity::parse(quantity_input)?;
    Ok(PendingAction::add(product_id, quantity))
}

fn validate_delete(
    product_id: Option<&str>,
    action: Option<&str>,
) -> std::result::Result<PendingAction, ValidationError> {
    let product_id = ProductId::parse(product_id)?;
    let kind = match action {
        Some(action) if !action.is_empty() => ActionKind::parse(action),
        _ => return Err(ValidationError::MissingAction),
    };
    Ok(PendingAction::delete(product_id, kind))
}
