//! Catalog sort order.

use std::cmp::Ordering;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use tracing::warn;
use vitrine_core::Product;

/// Catalog sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortSpec {
    /// Keep feed order.
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortSpec {
    /// Parse from a user-facing token. Unknown tokens fall back to feed order.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-asc" | "price-ascending" | "price_asc" => Self::PriceAsc,
            "price-desc" | "price-descending" | "price_desc" => Self::PriceDesc,
            "name-asc" | "name-ascending" | "name_asc" => Self::NameAsc,
            "name-desc" | "name-descending" | "name_desc" => Self::NameDesc,
            _ => Self::None,
        }
    }

    /// Convert to the user-facing token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    /// Sort `products` in place. [`SortSpec::None`] keeps the incoming order.
    ///
    /// Names compare with the Unicode root collation, so accented letters sort
    /// next to their base letter and `ё` follows `е`.
    pub fn apply(self, products: &mut [&Product]) {
        match self {
            Self::None => {}
            Self::PriceAsc => products.sort_by(|a, b| by_price(a, b)),
            Self::PriceDesc => products.sort_by(|a, b| by_price(b, a)),
            Self::NameAsc | Self::NameDesc => {
                let collator = name_collator();
                let descending = self == Self::NameDesc;
                products.sort_by(|a, b| {
                    let (a, b) = if descending { (b, a) } else { (a, b) };
                    by_name(collator.as_ref(), a, b)
                });
            }
        }
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Ties fall through to the product id, which is unique, so each
// descending order is the exact reverse of its ascending order.
fn by_price(a: &Product, b: &Product) -> Ordering {
    a.price.cmp(&b.price).then(a.id.cmp(&b.id))
}

fn by_name(collator: Option<&CollatorBorrowed<'_>>, a: &Product, b: &Product) -> Ordering {
    let collated = match collator {
        Some(collator) => collator.compare(&a.name, &b.name),
        None => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    };
    collated
        .then_with(|| a.name.cmp(&b.name))
        .then(a.id.cmp(&b.id))
}

fn name_collator() -> Option<CollatorBorrowed<'static>> {
    Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
        .inspect_err(|e| warn!(error = %e, "collation data unavailable, sorting names by code point"))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::{Price, ProductId};

    use super::*;

    fn product(id: u64, name: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_units(price),
            category: "x".to_string(),
            image: String::new(),
            description: String::new(),
        }
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|p| p.id.as_u64()).collect()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "banana", 30),
            product(2, "Apple", 10),
            product(3, "cherry", 30),
            product(4, "apple", 20),
            product(5, "Date", 10),
        ]
    }

    #[test]
    fn test_parse_round_trip() {
        for spec in [
            SortSpec::None,
            SortSpec::PriceAsc,
            SortSpec::PriceDesc,
            SortSpec::NameAsc,
            SortSpec::NameDesc,
        ] {
            assert_eq!(SortSpec::parse(spec.as_str()), spec);
        }
        assert_eq!(SortSpec::parse("relevance"), SortSpec::None);
    }

    #[test]
    fn test_none_keeps_feed_order() {
        let catalog = catalog();
        let mut refs: Vec<&Product> = catalog.iter().collect();
        SortSpec::None.apply(&mut refs);
        assert_eq!(ids(&refs), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_price_ascending() {
        let catalog = catalog();
        let mut refs: Vec<&Product> = catalog.iter().collect();
        SortSpec::PriceAsc.apply(&mut refs);
        assert_eq!(ids(&refs), vec![2, 5, 4, 1, 3]);
    }

    #[test]
    fn test_name_ascending_folds_case() {
        let catalog = catalog();
        let mut refs: Vec<&Product> = catalog.iter().collect();
        SortSpec::NameAsc.apply(&mut refs);
        // Lowercase sorts before uppercase when the letters agree
        assert_eq!(ids(&refs), vec![4, 2, 1, 3, 5]);
    }

    #[test]
    fn test_name_ascending_non_ascii() {
        let catalog = vec![
            product(1, "жук", 10),
            product(2, "ёлка", 10),
            product(3, "елка", 10),
            product(4, "Zebra", 10),
            product(5, "Éclair", 10),
        ];
        let mut refs: Vec<&Product> = catalog.iter().collect();
        SortSpec::NameAsc.apply(&mut refs);
        let names: Vec<&str> = refs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Éclair", "Zebra", "елка", "ёлка", "жук"]);

        SortSpec::NameDesc.apply(&mut refs);
        assert_eq!(ids(&refs), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_descending_is_exact_reverse() {
        let catalog = catalog();
        for (asc, desc) in [
            (SortSpec::PriceAsc, SortSpec::PriceDesc),
            (SortSpec::NameAsc, SortSpec::NameDesc),
        ] {
            let mut up: Vec<&Product> = catalog.iter().collect();
            let mut down: Vec<&Product> = catalog.iter().collect();
            asc.apply(&mut up);
            desc.apply(&mut down);
            down.reverse();
            assert_eq!(ids(&up), ids(&down), "{asc} vs {desc}");
        }
    }
}
