//! Cart entries and their reconciliation against the product catalog.
//!
//! The commerce API only knows `{productId, qty}` pairs. Rendering a cart
//! needs the product's name, image and cost too, so every time either the
//! catalog or the server cart changes the two are joined into [`CartItem`]s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A server-side cart record (`GET /cart`, `POST /cart` responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// ID of the product in the cart.
    pub product_id: ProductId,
    /// Number of units. The only field the storefront ever changes.
    pub qty: u32,
}

impl CartEntry {
    /// Create a new cart entry.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, qty: u32) -> Self {
        Self {
            product_id: product_id.into(),
            qty,
        }
    }
}

/// A cart entry joined with its product, used only for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// Full product details from the catalog.
    pub product: Product,
    /// Number of units.
    pub qty: u32,
}

impl CartItem {
    /// ID of the product in this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Cost of the whole line (`cost × qty`).
    #[must_use]
    pub fn line_cost(&self) -> Price {
        self.product.cost.times(self.qty)
    }

    /// Back to the wire form.
    #[must_use]
    pub fn to_entry(&self) -> CartEntry {
        CartEntry::new(self.product.id.clone(), self.qty)
    }
}

/// Join server cart entries with the catalog.
///
/// The output keeps the server's order. Entries whose product ID is not in
/// `catalog` are dropped silently.
#[must_use]
pub fn generate_cart_items_from(entries: &[CartEntry], catalog: &[Product]) -> Vec<CartItem> {
    let by_id: HashMap<&ProductId, &Product> =
        catalog.iter().map(|product| (&product.id, product)).collect();

    entries
        .iter()
        .filter_map(|entry| {
            by_id.get(&entry.product_id).map(|product| CartItem {
                product: (*product).clone(),
                qty: entry.qty,
            })
        })
        .collect()
}

/// Whether the cart already has a line for `product_id`.
#[must_use]
pub fn is_item_in_cart(items: &[CartItem], product_id: &ProductId) -> bool {
    items.iter().any(|item| item.product_id() == product_id)
}

/// Total cost of every line in the cart.
#[must_use]
pub fn total_cost(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_cost).sum()
}

/// Total number of units in the cart.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u32 {
    items.iter().map(|item| item.qty).sum()
}
