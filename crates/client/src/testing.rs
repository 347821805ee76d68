//! In-memory page for tests.
//!
//! [`RecordingPage`] keeps the state a real page would show (labels, enabled
//! flags, rows, anchors) and a log of every call in order.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use storecart_core::{CartLine, ControlId, Money, ProductId};

use crate::page::CartPage;

/// One call made on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    ControlLabel(ControlId, String),
    ControlEnabled(ControlId, bool),
    ControlLoading(ControlId, bool),
    CartQuantity(u64),
    LineQuantity(ControlId, i64),
    LineTotal(ControlId, Money),
    LineRemoved(ControlId),
    CartTotal(Money),
    Alert(String),
    Reload,
}

#[derive(Debug, Default)]
struct PageState {
    events: Vec<PageEvent>,
    labels: HashMap<ControlId, String>,
    disabled: HashSet<ControlId>,
    loading: HashSet<ControlId>,
    has_quantity_anchor: bool,
    cart_quantity: Option<u64>,
    cart_total: Option<Money>,
    /// Rows keyed by a control they contain.
    rows: HashMap<ControlId, CartLine>,
}

/// A page that records what the client did to it.
#[derive(Debug, Default)]
pub struct RecordingPage {
    state: Mutex<PageState>,
}

impl RecordingPage {
    /// An empty page: no controls, no rows, no quantity anchor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a labelled control.
    #[must_use]
    pub fn with_control(self, control: impl Into<ControlId>, label: &str) -> Self {
        self.state().labels.insert(control.into(), label.to_owned());
        self
    }

    /// Give the page a `cart_quantity` anchor.
    #[must_use]
    pub fn with_quantity_anchor(self) -> Self {
        self.state().has_quantity_anchor = true;
        self
    }

    /// Add a cart row enclosing `control`.
    #[must_use]
    pub fn with_row(self, control: impl Into<ControlId>, product_id: &str, quantity: u64) -> Self {
        self.state().rows.insert(
            control.into(),
            CartLine::new(ProductId::new(product_id), quantity, None),
        );
        self
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: PageEvent) {
        self.state().events.push(event);
    }

    /// Every call, in order.
    #[must_use]
    pub fn events(&self) -> Vec<PageEvent> {
        self.state().events.clone()
    }

    /// Alert messages, in order.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                PageEvent::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn reloads(&self) -> usize {
        self.state()
            .events
            .iter()
            .filter(|event| matches!(event, PageEvent::Reload))
            .count()
    }

    #[must_use]
    pub fn label(&self, control: &ControlId) -> Option<String> {
        self.state().labels.get(control).cloned()
    }

    #[must_use]
    pub fn is_enabled(&self, control: &ControlId) -> bool {
        !self.state().disabled.contains(control)
    }

    #[must_use]
    pub fn is_loading(&self, control: &ControlId) -> bool {
        self.state().loading.contains(control)
    }

    /// Value in the `cart_quantity` anchor.
    #[must_use]
    pub fn cart_quantity(&self) -> Option<u64> {
        self.state().cart_quantity
    }

    /// Page-wide total.
    #[must_use]
    pub fn cart_total(&self) -> Option<Money> {
        self.state().cart_total
    }

    /// The row enclosing `control`, if still shown.
    #[must_use]
    pub fn row(&self, control: &ControlId) -> Option<CartLine> {
        self.state().rows.get(control).cloned()
    }
}

impl CartPage for RecordingPage {
    fn control_label(&self, control: &ControlId) -> Option<String> {
        self.label(control)
    }

    fn set_control_label(&self, control: &ControlId, label: &str) {
        let mut state = self.state();
        state.labels.insert(control.clone(), label.to_owned());
        state
            .events
            .push(PageEvent::ControlLabel(control.clone(), label.to_owned()));
    }

    fn set_control_enabled(&self, control: &ControlId, enabled: bool) {
        let mut state = self.state();
        if enabled {
            state.disabled.remove(control);
        } else {
            state.disabled.insert(control.clone());
        }
        state
            .events
            .push(PageEvent::ControlEnabled(control.clone(), enabled));
    }

    fn set_control_loading(&self, control: &ControlId, loading: bool) {
        let mut state = self.state();
        if loading {
            state.loading.insert(control.clone());
        } else {
            state.loading.remove(control);
        }
        state
            .events
            .push(PageEvent::ControlLoading(control.clone(), loading));
    }

    fn set_cart_quantity(&self, quantity: u64) {
        let mut state = self.state();
        if state.has_quantity_anchor {
            state.cart_quantity = Some(quantity);
            state.events.push(PageEvent::CartQuantity(quantity));
        }
    }

    fn set_line_quantity(&self, control: &ControlId, quantity: i64) {
        let mut state = self.state();
        if let Some(line) = state.rows.get_mut(control) {
            line.apply_quantity(quantity);
        }
        state
            .events
            .push(PageEvent::LineQuantity(control.clone(), quantity));
    }

    fn set_line_total(&self, control: &ControlId, total: &Money) {
        let mut state = self.state();
        if let Some(line) = state.rows.get_mut(control) {
            line.line_total = Some(*total);
        }
        state
            .events
            .push(PageEvent::LineTotal(control.clone(), *total));
    }

    fn remove_line(&self, control: &ControlId) {
        let mut state = self.state();
        state.rows.remove(control);
        state.events.push(PageEvent::LineRemoved(control.clone()));
    }

    fn set_cart_total(&self, total: &Money) {
        let mut state = self.state();
        state.cart_total = Some(*total);
        state.events.push(PageEvent::CartTotal(*total));
    }

    fn alert(&self, message: &str) {
        self.record(PageEvent::Alert(message.to_owned()));
    }

    fn reload(&self) {
        self.record(PageEvent::Reload);
    }
}
