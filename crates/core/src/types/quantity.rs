//! Quantity requested by the shopper when adding to the cart.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated add-to-cart quantity.
///
/// The text the shopper entered is kept as-is (trimmed) and forwarded to the
/// cart service, which performs its own integer parsing. Client-side the input
/// only has to be numeric and at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestedQuantity(String);

impl RequestedQuantity {
    /// Quantity used when the page has no quantity input.
    pub const DEFAULT: &'static str = "1";

    /// Parse the value of the quantity input.
    ///
    /// `None` means the page has no quantity input at all, which yields the
    /// default quantity of 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuantity`] if the input is empty,
    /// not a finite number, or less than 1.
    pub fn parse(input: Option<&str>) -> Result<Self, ValidationError> {
        let Some(raw) = input else {
            return Ok(Self::default());
        };

        let trimmed = raw.trim();
        let invalid = || ValidationError::InvalidQuantity(raw.to_owned());

        let value: f64 = trimmed.parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 1.0 {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// The quantity as sent to the cart service.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestedQuantity {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for RequestedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_defaults_to_one() {
        assert_eq!(RequestedQuantity::parse(None).unwrap().as_str(), "1");
    }

    #[test]
    fn test_accepts_numeric_at_least_one() {
        for input in ["1", "2", " 7 ", "10", "1.5", "1e2"] {
            assert!(
                RequestedQuantity::parse(Some(input)).is_ok(),
                "expected {input:?} to be accepted"
            );
        }
        assert_eq!(RequestedQuantity::parse(Some(" 3 ")).unwrap().as_str(), "3");
    }

    #[test]
    fn test_rejects_empty_non_numeric_and_below_one() {
        for input in ["", "   ", "0", "-1", "0.5", "abc", "2x", "NaN", "inf"] {
            assert_eq!(
                RequestedQuantity::parse(Some(input)),
                Err(ValidationError::InvalidQuantity(input.to_owned())),
                "expected {input:?} to be rejected"
            );
        }
    }
}
