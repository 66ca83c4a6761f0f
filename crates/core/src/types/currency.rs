//! Currency codes and amount formatting.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Error returned when a currency code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(pub String);

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
}

impl CurrencyCode {
    /// Display symbol placed in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD => "$",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
        }
    }

    /// Format an amount in this currency, e.g. `€35.00`.
    #[must_use]
    pub fn format(self, amount: Decimal) -> String {
        format_amount(amount, self.symbol())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            "GBP" => Ok(Self::GBP),
            _ => Err(CurrencyCodeError(s.to_owned())),
        }
    }
}

/// Format an amount with a currency symbol prefix and two decimal places.
///
/// Midpoints round away from zero, so `2.345` becomes `2.35`.
///
/// ```
/// use garval_core::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(35, 0), "€"), "€35.00");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{rounded:.2}")
}
