//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Login and registration against the QKart API
//! - `cart` - Cart loading and add-to-cart rules

pub mod auth;
pub mod cart;
