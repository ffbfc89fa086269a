//! Core types for QKart.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod cart;
pub mod credentials;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartEntry, CartItem, generate_cart_items_from, is_item_in_cart, item_count, total_cost};
pub use credentials::{
    Credentials, LoginForm, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, RegisterForm, ValidationError,
};
pub use id::*;
pub use price::Price;
pub use product::Product;
