//! Cart line items.
//!
//! A [`LineItem`] serializes to the persisted cart entry shape:
//!
//! ```json
//! {"id": "ACE-500", "name": "Aceite 500ml", "price": 12.5, "image": "https://garval.es/files/aceite.jpg", "quantity": 2}
//! ```
//!
//! Entries written by older sessions may lack `name`, `image` or `quantity`,
//! or carry a quantity below one; those are read leniently. `id` and `price`
//! are required.

use garval_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: ProductId,
    #[serde(default)]
    name: String,
    price: Price,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_image"
    )]
    image: Option<String>,
    #[serde(default = "default_quantity", deserialize_with = "deserialize_quantity")]
    quantity: u32,
}

impl LineItem {
    /// Create a line item with a quantity of one and no image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            quantity: 1,
        }
    }

    /// Set the image reference. Empty strings mean no image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = non_empty(image.into());
        self
    }

    /// Set the quantity, clamped to at least one.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price * quantity` for this entry.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    pub(crate) fn set_image(&mut self, image: Option<String>) {
        self.image = image.and_then(non_empty);
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub(crate) fn add_quantity(&mut self, quantity: u32) {
        self.set_quantity(self.quantity.saturating_add(quantity));
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

const fn default_quantity() -> u32 {
    1
}

fn deserialize_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.and_then(non_empty))
}

/// Quantities may be stored as integers, floats, or null by older sessions.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(i64),
    Float(f64),
}

fn deserialize_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<RawQuantity>::deserialize(deserializer)?;
    Ok(match raw {
        None => 1,
        Some(RawQuantity::Int(n)) => clamp_quantity(n),
        #[allow(clippy::cast_possible_truncation)]
        Some(RawQuantity::Float(f)) if f.is_finite() => clamp_quantity(f.trunc() as i64),
        Some(RawQuantity::Float(_)) => 1,
    })
}

/// Clamp an arbitrary integer to the valid quantity range `1..=u32::MAX`.
pub(crate) fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}
