//! Cart change notifications.
//!
//! The cart does not render anything itself. After each mutation it hands a
//! [`CartEvent`] to its [`CartListener`]; the UI layer uses these to update
//! cart badges, show the "added to cart" toast, and reload the cart page
//! when an item is removed from it.

use core::fmt;
use std::str::FromStr;

use garval_core::ProductId;
use thiserror::Error;

/// A change the UI layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// An item was added or its quantity increased by an add.
    ItemAdded {
        id: ProductId,
        /// Localized confirmation message for display.
        message: String,
    },
    /// An item was removed from the cart.
    ItemRemoved { id: ProductId },
    /// The total item count may have changed.
    CountChanged { count: u64 },
}

/// Receives cart change notifications.
pub trait CartListener {
    fn on_event(&self, event: &CartEvent);
}

/// Listener that writes events to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl CartListener for LogListener {
    fn on_event(&self, event: &CartEvent) {
        match event {
            CartEvent::ItemAdded { id, message } => {
                tracing::info!(product_id = %id, "{message}");
            }
            CartEvent::ItemRemoved { id } => {
                tracing::info!(product_id = %id, "Item removed from cart");
            }
            CartEvent::CountChanged { count } => {
                tracing::debug!(count, "Cart count updated");
            }
        }
    }
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl CartListener for NoopListener {
    fn on_event(&self, _event: &CartEvent) {}
}

/// Error returned when a language code is not supported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: {0}")]
pub struct LocaleError(pub String);

/// Storefront display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// Toast shown after adding to the cart.
    #[must_use]
    pub const fn item_added(self) -> &'static str {
        match self {
            Self::Es => "Producto añadido al carrito",
            Self::En => "Product added to cart",
        }
    }

    /// Shown when checkout is attempted with nothing in the cart.
    #[must_use]
    pub const fn empty_cart(self) -> &'static str {
        match self {
            Self::Es => "El carrito está vacío",
            Self::En => "Your cart is empty",
        }
    }

    /// Shown when the order API did not create an order.
    #[must_use]
    pub const fn order_failed(self) -> &'static str {
        match self {
            Self::Es => "Error al procesar el pedido",
            Self::En => "Error processing the order",
        }
    }

    /// Two-letter language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            _ => Err(LocaleError(s.to_owned())),
        }
    }
}
