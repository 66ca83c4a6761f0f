//! Subcommand implementations.
//!
//! Commands write their output to a caller-supplied writer so they can be
//! exercised without a terminal.

pub mod cart;
pub mod checkout;

use std::io;

use garval_cart::{CartError, CartStore, CheckoutError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Writing command output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),

    /// The cart could not be written to storage.
    #[error("Cart not saved: {0}")]
    Persist(#[from] CartError),

    /// Checkout did not produce an order.
    #[error("{message}: {source}")]
    Checkout {
        /// Localized summary for the customer.
        message: &'static str,
        source: CheckoutError,
    },
}

/// Surface a failed write from the last mutation.
///
/// The cart keeps working in memory when storage fails, but a CLI run ends
/// with the process, so an unsaved change is lost and must be reported.
fn ensure_persisted(cart: &mut CartStore) -> Result<(), CommandError> {
    if !cart.persistence_healthy() {
        cart.save()?;
    }
    Ok(())
}
