//! Product and cart line records.
//!
//! Both records keep the field names of the product feed (`id`, `name`,
//! `price`, `category`, `image`, `description`) so that a feed entry and a
//! stored cart line share one JSON shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog product as delivered by the product feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,
    /// Display name, matched by the search filter.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Category label, matched exactly by the category filter.
    pub category: String,
    /// Image reference (URL or path), empty when the feed has none.
    #[serde(default)]
    pub image: String,
    /// Long description shown in the detail view.
    #[serde(default)]
    pub description: String,
}

/// A product in the cart with the quantity the user intends to buy.
///
/// Serialized flat: the product fields and `quantity` sit side by side.
///
/// ```
/// use vitrine_core::CartLine;
///
/// let line: CartLine = serde_json::from_str(
///     r#"{"id":1,"name":"Chair","price":80,"category":"furniture","quantity":2}"#,
/// ).unwrap();
/// assert_eq!(line.quantity, 2);
/// assert_eq!(line.product.name, "Chair");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Start a new line with quantity 1.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Identifier of the underlying product.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn chair() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Chair".to_string(),
            price: Price::from_units(80),
            category: "furniture".to_string(),
            image: "img/chair.jpg".to_string(),
            description: "A wooden chair".to_string(),
        }
    }

    #[test]
    fn test_product_optional_fields_default_to_empty() {
        let product: Product =
            serde_json::from_str(r#"{"id":3,"name":"Lamp","price":12.5,"category":"light"}"#)
                .unwrap();
        assert_eq!(product.image, "");
        assert_eq!(product.description, "");
        assert_eq!(product.price.amount(), Decimal::new(125, 1));
    }

    #[test]
    fn test_product_requires_name() {
        let result = serde_json::from_str::<Product>(r#"{"id":3,"price":1,"category":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cart_line_serializes_flat() {
        let line = CartLine::new(chair());
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Chair");
        assert_eq!(value["quantity"], 1);
        assert!(value.get("product").is_none());
    }

    #[test]
    fn test_line_total() {
        let mut line = CartLine::new(chair());
        line.quantity = 3;
        assert_eq!(line.line_total(), Decimal::from(240));
        assert_eq!(line.id(), ProductId::new(1));
    }
}
