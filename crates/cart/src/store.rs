//! The cart state manager.
//!
//! # Persistence
//!
//! The cart is read from its [`StorageBackend`] once by [`CartStore::load`]
//! and written back after every mutation. Reads never fail from the
//! caller's point of view: a missing slot gives an empty cart, a corrupt
//! slot gives an empty cart, and individual corrupt entries are dropped.
//!
//! Writes that fail are logged and the in-memory cart stays authoritative
//! for the rest of the session. [`CartStore::persistence_healthy`] reports
//! whether the last write succeeded; [`CartStore::save`] returns the error
//! to callers that want it.

use core::fmt;

use garval_core::ProductId;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::events::{CartEvent, CartListener, Locale, LogListener};
use crate::image::{StoreOrigin, normalize_image_url};
use crate::item::{LineItem, clamp_quantity};
use crate::storage::StorageBackend;

/// Ordered, id-unique collection of line items with write-through persistence.
pub struct CartStore {
    items: Vec<LineItem>,
    storage: Box<dyn StorageBackend>,
    origin: StoreOrigin,
    listener: Box<dyn CartListener>,
    locale: Locale,
    persistence_healthy: bool,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("storage", &self.storage)
            .field("origin", &self.origin)
            .field("locale", &self.locale)
            .field("persistence_healthy", &self.persistence_healthy)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty cart over `storage` without reading it.
    ///
    /// Call [`load`](Self::load) to pick up a previously persisted cart, or
    /// use [`open`](Self::open) to do both.
    #[must_use]
    pub fn new(storage: Box<dyn StorageBackend>, origin: StoreOrigin) -> Self {
        Self {
            items: Vec::new(),
            storage,
            origin,
            listener: Box::new(LogListener),
            locale: Locale::default(),
            persistence_healthy: true,
        }
    }

    /// Create a cart and load its persisted contents.
    #[must_use]
    pub fn open(storage: Box<dyn StorageBackend>, origin: StoreOrigin) -> Self {
        let mut store = Self::new(storage, origin);
        store.load();
        store
    }

    /// Replace the change listener (defaults to [`LogListener`]).
    #[must_use]
    pub fn with_listener(mut self, listener: Box<dyn CartListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Set the language used for notification messages.
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// Missing or unreadable data yields an empty cart. Image references are
    /// normalized to absolute URLs, quantities below one are raised to one,
    /// and duplicate ids are merged.
    pub fn load(&mut self) {
        self.items = match self.storage.read() {
            Ok(Some(raw)) => decode_items(&raw, &self.origin),
            Ok(None) => {
                debug!("No persisted cart, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Vec::new()
            }
        };

        debug!(items = self.items.len(), "Cart loaded");
        self.notify_count();
    }

    /// Add an item, or increase the quantity of an existing entry with the same id.
    ///
    /// An existing entry keeps its name, price and image. Quantities saturate
    /// at `u32::MAX`, so past that point [`count`](Self::count) grows by less
    /// than `item.quantity()`.
    pub fn add_item(&mut self, mut item: LineItem) {
        let added = item.quantity();
        let id = item.id().clone();

        if let Some(existing) = self.find_mut(&id) {
            existing.add_quantity(added);
            debug!(product_id = %id, quantity = existing.quantity(), "Increased cart quantity");
        } else {
            let image = item.image().map(|img| normalize_image_url(img, &self.origin));
            item.set_image(image);
            debug!(product_id = %id, quantity = added, "Added item to cart");
            self.items.push(item);
        }

        self.persist();
        self.notify_count();
        self.listener.on_event(&CartEvent::ItemAdded {
            id,
            message: self.locale.item_added().to_string(),
        });
    }

    /// Remove the entry for `id`. Absent ids are ignored.
    pub fn remove_item(&mut self, id: &str) {
        let Some(pos) = self.position(id) else {
            debug!(product_id = id, "Remove ignored, item not in cart");
            return;
        };

        let removed = self.items.remove(pos);
        debug!(product_id = %removed.id(), "Removed item from cart");

        self.persist();
        self.notify_count();
        self.listener.on_event(&CartEvent::ItemRemoved {
            id: removed.id().clone(),
        });
    }

    /// Set the quantity for `id`, clamped to at least one. Absent ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let Some(pos) = self.position(id) else {
            debug!(product_id = id, "Quantity update ignored, item not in cart");
            return;
        };

        let quantity = clamp_quantity(quantity);
        if let Some(item) = self.items.get_mut(pos) {
            item.set_quantity(quantity);
        }
        debug!(product_id = id, quantity, "Updated cart quantity");

        self.persist();
        self.notify_count();
    }

    /// Sum of `price * quantity` over all entries.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Empty the cart and persist the empty state.
    pub fn clear(&mut self) {
        self.items.clear();
        info!("Cart cleared");

        self.persist();
        self.notify_count();
    }

    /// Write the full cart to storage.
    ///
    /// Mutating operations call this themselves; use it directly only to
    /// retry after a failed write or to observe the write result.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&mut self) -> Result<()> {
        let result: Result<()> = serde_json::to_string(&self.items)
            .map_err(Into::into)
            .and_then(|json| self.storage.write(&json).map_err(Into::into));

        self.persistence_healthy = result.is_ok();
        result
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Entry for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the most recent write reached storage.
    #[must_use]
    pub const fn persistence_healthy(&self) -> bool {
        self.persistence_healthy
    }

    #[must_use]
    pub const fn origin(&self) -> &StoreOrigin {
        &self.origin
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, items = self.items.len(), "Failed to persist cart, keeping it in memory");
        }
    }

    fn notify_count(&self) {
        self.listener
            .on_event(&CartEvent::CountChanged { count: self.count() });
    }
}

/// Decode a persisted cart, keeping every entry that can be read.
fn decode_items(raw: &str, origin: &StoreOrigin) -> Vec<LineItem> {
    let entries = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(other) => {
            warn!(kind = json_kind(&other), "Persisted cart is not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Persisted cart is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let mut item = match serde_json::from_value::<LineItem>(entry) {
            Ok(item) => item,
            Err(e) => {
                warn!(index, error = %e, "Dropping unreadable cart entry");
                continue;
            }
        };

        if let Some(existing) = items.iter_mut().find(|i| i.id() == item.id()) {
            existing.add_quantity(item.quantity());
            continue;
        }

        let image = item.image().map(|img| normalize_image_url(img, origin));
        item.set_image(image);
        items.push(item);
    }

    items
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
