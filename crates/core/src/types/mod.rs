//! Core types for Garval.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod currency;
pub mod id;
pub mod price;

pub use currency::{CurrencyCode, CurrencyCodeError, format_amount};
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
