//! Vitrine storefront library.
//!
//! Catalog browsing, a persisted cart and a mock checkout, driven through
//! [`state::AppState`]. The binaries in this workspace are thin shells around
//! it, which keeps the whole flow testable without a terminal.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod query;
pub mod render;
pub mod shell;
pub mod state;
