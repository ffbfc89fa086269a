//! Cart service.
//!
//! The commerce API stores carts as bare `{productId, qty}` entries. This
//! service applies the add-to-cart rules, talks to the API and reconciles the
//! returned entries against the catalog.

use qkart_core::{CartItem, Product, ProductId, generate_cart_items_from, is_item_in_cart};
use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use crate::models::Notification;
use crate::qkart::{ApiError, CART_UNAVAILABLE_MESSAGE, QKartClient};

/// Shown when a guest tries to add to cart.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to add item to cart";

/// Shown when adding a product that is already in the cart.
pub const ALREADY_IN_CART_MESSAGE: &str =
    "Item already in cart. Use the cart sidebar to update quantity or remove item.";

/// Why a cart write did not happen.
#[derive(Debug, Error)]
pub enum CartError {
    /// No session token.
    #[error("login required")]
    LoginRequired,

    /// Duplicate prevention is on and the product is already in the cart.
    #[error("product already in cart")]
    AlreadyInCart,

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CartError {
    /// Notification describing the rejection.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::LoginRequired => Notification::warning(LOGIN_REQUIRED_MESSAGE),
            Self::AlreadyInCart => Notification::warning(ALREADY_IN_CART_MESSAGE),
            Self::Api(err) => Notification::error(err.user_message(CART_UNAVAILABLE_MESSAGE)),
        }
    }
}

/// Options for [`add_to_cart`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AddToCartOptions {
    /// Reject the write if the product is already in the cart.
    pub prevent_duplicate: bool,
}

impl AddToCartOptions {
    /// Options used by the "Add to cart" button on a product card.
    #[must_use]
    pub const fn from_product_card() -> Self {
        Self {
            prevent_duplicate: true,
        }
    }

    /// Options used by the quantity controls in the cart panel.
    #[must_use]
    pub const fn from_cart_panel() -> Self {
        Self {
            prevent_duplicate: false,
        }
    }
}

/// Set the quantity of a product in the user's cart.
///
/// Rejects without touching the network when there is no token, or when
/// `options.prevent_duplicate` is set and `items` already holds the product.
/// On success returns the API's new cart reconciled against `catalog`.
///
/// # Errors
///
/// Returns `CartError::LoginRequired`, `CartError::AlreadyInCart`, or
/// `CartError::Api` if the write fails.
#[instrument(skip(client, token, items, catalog), fields(product_id = %product_id))]
pub async fn add_to_cart(
    client: &QKartClient,
    token: Option<&SecretString>,
    items: &[CartItem],
    product_id: &ProductId,
    catalog: &[Product],
    qty: u32,
    options: AddToCartOptions,
) -> Result<Vec<CartItem>, CartError> {
    let Some(token) = token else {
        return Err(CartError::LoginRequired);
    };

    if options.prevent_duplicate && is_item_in_cart(items, product_id) {
        return Err(CartError::AlreadyInCart);
    }

    let entries = client.update_cart(token, product_id, qty).await?;
    Ok(generate_cart_items_from(&entries, catalog))
}

/// Fetch the user's cart and reconcile it against `catalog`.
///
/// # Errors
///
/// Returns an error if the API call fails.
#[instrument(skip(client, token, catalog))]
pub async fn load_cart(
    client: &QKartClient,
    token: &SecretString,
    catalog: &[Product],
) -> Result<Vec<CartItem>, ApiError> {
    let entries = client.cart(token).await?;
    Ok(generate_cart_items_from(&entries, catalog))
}
