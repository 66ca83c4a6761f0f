//! Value types shared by the Garval cart and its command-line front end.
//!
//! Everything here is plain data with validation at construction: a
//! [`ProductId`] is never blank, a [`Price`] is never negative and always
//! survives being written to the persisted cart, and [`format_amount`] turns
//! a decimal into the two-place string the storefront shows. Storage,
//! networking and logging belong to `garval-cart`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
