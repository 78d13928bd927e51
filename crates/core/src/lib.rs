//! Vitrine Core - Shared domain types.
//!
//! This crate provides the types every Vitrine component agrees on:
//! - `storefront` - Catalog state, query pipeline, cart and checkout
//! - `cli` - One-shot command-line access to the same state
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, the product and
//!   cart line records, and the checkout form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
