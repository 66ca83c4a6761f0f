//! Garval Cart - Shopping cart state for the storefront.
//!
//! The cart is a flat, ordered list of [`LineItem`]s keyed by product id.
//! A [`CartStore`] owns that list, writes it to an injected
//! [`StorageBackend`] after every mutation, and reports changes to a
//! [`CartListener`] so the UI layer can refresh badges and show messages.
//!
//! # Example
//!
//! ```
//! use garval_cart::{CartStore, LineItem, MemoryStorage, StoreOrigin};
//! use garval_core::{Price, ProductId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let origin = StoreOrigin::parse("https://garval.es")?;
//! let mut cart = CartStore::open(Box::new(MemoryStorage::new()), origin);
//!
//! let item = LineItem::new(ProductId::parse("ACE-500")?, "Aceite 500ml", Price::from_cents(1250)?)
//!     .with_image("files/aceite.jpg");
//! cart.add_item(item);
//!
//! assert_eq!(cart.count(), 1);
//! assert_eq!(cart.items()[0].image(), Some("https://garval.es/files/aceite.jpg"));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`store`] - The cart state manager
//! - [`item`] - Line items and their persisted shape
//! - [`storage`] - Storage backends (in-memory, file)
//! - [`image`] - Image URL normalization against the storefront origin
//! - [`events`] - Change notifications and localized messages
//! - [`checkout`] - Order submission to the storefront API
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod image;
pub mod item;
pub mod storage;
pub mod store;

pub use checkout::{
    CheckoutClient, CheckoutError, CustomerInfo, OrderConfirmation, OrderRequest, submit_order,
};
pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use events::{CartEvent, CartListener, Locale, LocaleError, LogListener, NoopListener};
pub use image::{OriginError, StoreOrigin, normalize_image_url};
pub use item::LineItem;
pub use storage::{CART_STORAGE_KEY, FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::CartStore;
