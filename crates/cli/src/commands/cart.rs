//! Cart editing and inspection commands.

use std::io::Write;

use garval_cart::{CartStore, LineItem};
use garval_core::{CurrencyCode, Price, ProductId};

use super::{CommandError, ensure_persisted};

/// Add `quantity` units of a product.
pub fn add(
    cart: &mut CartStore,
    id: ProductId,
    name: String,
    price: Price,
    image: Option<String>,
    quantity: u32,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut item = LineItem::new(id.clone(), name, price).with_quantity(quantity);
    if let Some(image) = image {
        item = item.with_image(image);
    }

    cart.add_item(item);
    ensure_persisted(cart)?;

    writeln!(out, "{}", cart.locale().item_added())?;
    if let Some(entry) = cart.get(id.as_str()) {
        writeln!(out, "{} x{}", entry.id(), entry.quantity())?;
    }
    Ok(())
}

/// Remove a product. Unknown ids are reported but not treated as errors.
pub fn remove(cart: &mut CartStore, id: &str, out: &mut impl Write) -> Result<(), CommandError> {
    if cart.get(id).is_none() {
        writeln!(out, "{id} is not in the cart")?;
        return Ok(());
    }

    cart.remove_item(id);
    ensure_persisted(cart)?;

    writeln!(out, "Removed {id}")?;
    Ok(())
}

/// Set the quantity of a product already in the cart.
pub fn update(
    cart: &mut CartStore,
    id: &str,
    quantity: i64,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    cart.update_quantity(id, quantity);
    ensure_persisted(cart)?;

    match cart.get(id) {
        Some(entry) => writeln!(out, "{} x{}", entry.id(), entry.quantity())?,
        None => writeln!(out, "{id} is not in the cart")?,
    }
    Ok(())
}

/// Print one line per entry followed by the total.
pub fn list(
    cart: &CartStore,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if cart.is_empty() {
        writeln!(out, "{}", cart.locale().empty_cart())?;
        return Ok(());
    }

    for item in cart.items() {
        writeln!(
            out,
            "{:>3} x {} ({})  {}  {}",
            item.quantity(),
            item.name(),
            item.id(),
            currency.format(item.price().amount()),
            currency.format(item.line_total()),
        )?;
    }
    total(cart, currency, out)
}

/// Print the formatted cart total.
pub fn total(
    cart: &CartStore,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    writeln!(out, "Total: {}", currency.format(cart.total()))?;
    Ok(())
}

/// Empty the cart.
pub fn clear(cart: &mut CartStore, out: &mut impl Write) -> Result<(), CommandError> {
    cart.clear();
    ensure_persisted(cart)?;

    writeln!(out, "Cart cleared")?;
    Ok(())
}
