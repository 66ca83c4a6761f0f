//! Type-safe unit price using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so cart totals never accumulate binary
//! floating point error. On the wire (and in the persisted cart) a price is a
//! plain JSON number, matching what the storefront's product buttons emit.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input could not be read as a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount has more precision than a JSON number can carry exactly.
    #[error("price cannot be stored exactly: {0}")]
    Unrepresentable(Decimal),
}

/// A non-negative unit price.
///
/// The currency is not part of the value; the cart is single-currency and
/// the symbol is supplied wherever a price is formatted.
///
/// Every `Price` reads back unchanged after being written as a JSON number:
/// whole amounts up to `u64::MAX` are written as integers, anything else
/// must survive a trip through `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero, or
    /// `PriceError::Unrepresentable` if it would not survive being stored
    /// as a JSON number (e.g. `0.12345678901234567890`).
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        if !wire_value(amount).is_exact(amount) {
            return Err(PriceError::Unrepresentable(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from minor units (e.g. cents).
    ///
    /// # Errors
    ///
    /// Returns an error if `cents` is below zero or too large to store exactly.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The unit amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Line amount for `quantity` units. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.0
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX)
    }

    fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::Invalid(value.to_string()));
        }
        // f64 Display is the shortest representation that round-trips,
        // so 19.99 parses back as exactly 19.99.
        value.to_string().parse()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// The JSON number a price is written as.
#[derive(Debug, Clone, Copy)]
enum WireValue {
    Whole(u64),
    Float(f64),
}

impl WireValue {
    /// Whether reading this value back yields exactly `amount`.
    fn is_exact(self, amount: Decimal) -> bool {
        match self {
            Self::Whole(_) => true,
            Self::Float(f) => {
                f.is_finite() && f.to_string().parse::<Decimal>().is_ok_and(|back| back == amount)
            }
        }
    }
}

fn wire_value(amount: Decimal) -> WireValue {
    let normalized = amount.normalize();
    if normalized.scale() == 0
        && let Some(whole) = normalized.to_u64()
    {
        return WireValue::Whole(whole);
    }
    WireValue::Float(normalized.to_f64().unwrap_or(f64::NAN))
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match wire_value(self.0) {
            WireValue::Whole(whole) => serializer.serialize_u64(whole),
            WireValue::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        Price::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        Price::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        Price::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        v.parse().map_err(E::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(Price::new(dec("0")).is_ok());
        assert!(Price::new(dec("12.50")).is_ok());
        assert_eq!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(dec("-0.01")))
        );
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).unwrap().amount(), dec("19.99"));
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn test_times() {
        let price = Price::new(dec("12.5")).unwrap();
        assert_eq!(price.times(3), dec("37.5"));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_times_saturates() {
        let price = Price::new(dec("100000000000000000000")).unwrap();
        assert_eq!(price.times(u32::MAX), Decimal::MAX);
    }

    #[test]
    fn test_new_rejects_unrepresentable() {
        for amount in [
            "0.12345678901234567890",
            "18446744073709551616",
            "18446744073709551617",
            "79228162514264337593543950335",
        ] {
            assert_eq!(
                Price::new(dec(amount)),
                Err(PriceError::Unrepresentable(dec(amount))),
                "{amount} should be rejected"
            );
        }
        assert!("0.12345678901234567890".parse::<Price>().is_err());
        assert!(serde_json::from_str::<Price>("\"18446744073709551617\"").is_err());
    }

    #[test]
    fn test_new_accepts_storable_extremes() {
        for amount in ["18446744073709551615", "1000000000000000000000", "0.000001", "19.99"] {
            assert!(Price::new(dec(amount)).is_ok(), "{amount} should be accepted");
        }
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::new(dec("5")).unwrap().to_string(), "5.00");
        assert_eq!(Price::new(dec("19.9")).unwrap().to_string(), "19.90");
    }

    #[test]
    fn test_serialize_as_json_number() {
        let whole = Price::new(dec("10.00")).unwrap();
        assert_eq!(serde_json::to_string(&whole).unwrap(), "10");

        let fractional = Price::new(dec("19.99")).unwrap();
        assert_eq!(serde_json::to_string(&fractional).unwrap(), "19.99");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_float: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(from_float.amount(), dec("19.99"));

        let from_int: Price = serde_json::from_str("7").unwrap();
        assert_eq!(from_int.amount(), dec("7"));

        let from_str: Price = serde_json::from_str("\"4.25\"").unwrap();
        assert_eq!(from_str.amount(), dec("4.25"));
    }

    #[test]
    fn test_deserialize_rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>("-3.5").is_err());
        assert!(serde_json::from_str::<Price>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Price>("null").is_err());
    }

    #[test]
    fn test_json_value_survives_round_trip() {
        for amount in ["0.1", "19.99", "18446744073709551615", "1000000000000000000000"] {
            let price = Price::new(dec(amount)).unwrap();
            let json = serde_json::to_string(&price).unwrap();
            let back: Price = serde_json::from_str(&json).unwrap();
            assert_eq!(back, price, "{amount} changed after {json}");
        }
    }
}
