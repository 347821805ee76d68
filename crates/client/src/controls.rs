//! Cart controls and the clicks they produce.
//!
//! There is exactly one binding per control class. A page binding reads the
//! clicked element into a [`ClickEvent`] and hands it to
//! [`crate::CartClient::on_click`].

use storecart_core::ControlId;

/// The kinds of cart control a page can carry, keyed by CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlClass {
    /// Add-to-cart button on product listing and detail pages.
    AddCart,
    /// Increment/decrement button inside a cart row.
    UpdateCart,
    /// Remove button inside a cart row.
    DeleteCart,
}

impl ControlClass {
    pub const ALL: [Self; 3] = [Self::AddCart, Self::UpdateCart, Self::DeleteCart];

    /// CSS class the binding listens on.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::AddCart => "add-cart",
            Self::UpdateCart => "update-cart",
            Self::DeleteCart => "delete-cart",
        }
    }

    /// Find the cart control class in a whitespace-separated class list.
    ///
    /// The first cart class in list order wins.
    #[must_use]
    pub fn from_class_list(classes: &str) -> Option<Self> {
        classes
            .split_whitespace()
            .find_map(|class| Self::ALL.into_iter().find(|c| c.class_name() == class))
    }
}

/// Values read off the clicked element and its page context.
///
/// Which fields matter depends on the control class:
/// - add reads `value` (product id) and `quantity_input`
/// - update and delete read `product_id` and `action`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlData {
    /// The element's `value` attribute.
    pub value: Option<String>,
    /// `data-product-id`.
    pub product_id: Option<String>,
    /// `data-action`.
    pub action: Option<String>,
    /// Value of the page's quantity input; `None` when the page has none.
    pub quantity_input: Option<String>,
}

/// A click on a cart control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub control: ControlId,
    pub class: ControlClass,
    pub data: ControlData,
}

impl ClickEvent {
    /// Click on an add-to-cart button.
    #[must_use]
    pub fn add(
        control: impl Into<ControlId>,
        product_id: Option<&str>,
        quantity_input: Option<&str>,
    ) -> Self {
        Self {
            control: control.into(),
            class: ControlClass::AddCart,
            data: ControlData {
                value: product_id.map(str::to_owned),
                quantity_input: quantity_input.map(str::to_owned),
                ..ControlData::default()
            },
        }
    }

    /// Click on a row's increment/decrement button.
    #[must_use]
    pub fn update(
        control: impl Into<ControlId>,
        product_id: Option<&str>,
        action: Option<&str>,
    ) -> Self {
        Self::row(control, ControlClass::UpdateCart, product_id, action)
    }

    /// Click on a row's remove button.
    #[must_use]
    pub fn delete(
        control: impl Into<ControlId>,
        product_id: Option<&str>,
        action: Option<&str>,
    ) -> Self {
        Self::row(control, ControlClass::DeleteCart, product_id, action)
    }

    fn row(
        control: impl Into<ControlId>,
        class: ControlClass,
        product_id: Option<&str>,
        action: Option<&str>,
    ) -> Self {
        Self {
            control: control.into(),
            class,
            data: ControlData {
                product_id: product_id.map(str::to_owned),
                action: action.map(str::to_owned),
                ..ControlData::default()
            },
        }
    }
}
