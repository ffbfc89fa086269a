//! Product catalog entries.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product available to buy, as returned by `GET /products`.
///
/// Products are immutable from the storefront's point of view. The wire
/// format uses `_id` and `image`:
///
/// ```json
/// {
///     "name": "iPhone XR",
///     "category": "Phones",
///     "cost": 100,
///     "rating": 4,
///     "image": "https://i.imgur.com/lulqWzW.jpg",
///     "_id": "v4sLtEcMpzabRyfx"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Name or title of the product.
    pub name: String,
    /// Category the product belongs to.
    pub category: String,
    /// Price to buy one unit.
    pub cost: Price,
    /// Aggregate rating, an integer out of five.
    pub rating: u8,
    /// URL of the product image.
    #[serde(rename = "image")]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_wire_format() {
        let json = r#"{
            "name": "Basketball",
            "category": "Sports",
            "cost": 100,
            "rating": 5,
            "image": "https://i.imgur.com/lulqWzW.jpg",
            "_id": "upLK9JbQ4rMhTwt4"
        }"#;

        let product: Product = serde_json::from_str(json).expect("valid product json");
        assert_eq!(product.id.as_str(), "upLK9JbQ4rMhTwt4");
        assert_eq!(product.name, "Basketball");
        assert_eq!(product.cost, Price::from_units(100));
        assert_eq!(product.rating, 5);
        assert_eq!(product.image_url, "https://i.imgur.com/lulqWzW.jpg");
    }
}
