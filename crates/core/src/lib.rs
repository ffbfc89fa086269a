//! QKart Core - Shared types library.
//!
//! This crate provides the domain types used by the QKart storefront:
//! - Product catalog entries as returned by the commerce API
//! - Server cart entries and the reconciled cart items rendered in the UI
//! - Login and registration forms with their local validation rules
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session handling. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, carts and credential forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
