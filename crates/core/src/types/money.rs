//! Type-safe currency amounts using decimal arithmetic.
//!
//! The client never computes totals; amounts arrive from the cart service and
//! are only formatted for display.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A currency amount as reported by the cart service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }
}

/// Formats as symbol plus amount rounded to two decimals, e.g. `$12.50`.
///
/// Ties round away from zero, so `0.125` shows as `$0.13`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(format!("unsupported currency code: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        let money = Money::new(Decimal::new(125, 1), CurrencyCode::USD);
        assert_eq!(money.to_string(), "$12.50");
    }

    #[test]
    fn test_display_rounds_extra_precision() {
        let money = Money::new(Decimal::new(19_999, 3), CurrencyCode::GBP);
        assert_eq!(money.to_string(), "£20.00");
    }

    #[test]
    fn test_display_rounds_ties_up() {
        let money = Money::new(Decimal::new(125, 3), CurrencyCode::USD);
        assert_eq!(money.to_string(), "$0.13");

        let money = Money::new(Decimal::new(10_625, 4), CurrencyCode::USD);
        assert_eq!(money.to_string(), "$1.07");
    }

    #[test]
    fn test_zero_amount() {
        let money = Money::new(Decimal::ZERO, CurrencyCode::default());
        assert_eq!(money.to_string(), "$0.00");
    }

    #[test]
    fn test_currency_code_parse_is_case_insensitive() {
        assert_eq!("eur".parse::<CurrencyCode>(), Ok(CurrencyCode::EUR));
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
