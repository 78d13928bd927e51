//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod checkout;
pub mod id;
pub mod price;
pub mod product;

pub use checkout::{CheckoutDetails, CheckoutError, CheckoutField, CheckoutForm};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{CartLine, Product};
