//! Newtype IDs for type-safe references to cart entities and page controls.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing a product identifier with a control identifier.

use crate::error::ValidationError;

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_str()`, `is_empty()`
/// - `From<String>` and `From<&str>` implementations
///
/// Values built through `new()` or `From` are not validated; types that need
/// validation add a `parse()` constructor on top.
///
/// # Example
///
/// ```rust
/// # use storecart_core::define_id;
/// define_id!(SkuId);
/// define_id!(RowId);
///
/// let sku = SkuId::new("A-1");
/// let row = RowId::new("A-1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = row;
/// # let _ = (sku, row);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the underlying value is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(ControlId);

impl ProductId {
    /// Parse a product id read from a control.
    ///
    /// Only emptiness is checked; the identifier is otherwise opaque to the
    /// client and validated by the cart service.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProductId`] if the input is absent
    /// or empty.
    pub fn parse(input: Option<&str>) -> Result<Self, ValidationError> {
        match input {
            Some(id) if !id.is_empty() => Ok(Self::new(id)),
            _ => Err(ValidationError::MissingProductId),
        }
    }
}
