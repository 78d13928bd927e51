//! The shopping cart.
//!
//! [`CartStore`] keeps one [`CartLine`] per product, in the order products
//! were first added, and writes the whole cart back to [`LocalStorage`] after
//! every mutation. A missing or unreadable record at startup simply means an
//! empty cart.

mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};
use vitrine_core::{CartLine, Product, ProductId};

/// Storage key of the persisted cart.
pub const CART_KEY: &str = "cart";

/// Serialize cart lines to their stored form (a JSON array).
///
/// # Errors
///
/// Returns [`StorageError::Serialize`] if serialization fails.
pub fn encode(lines: &[CartLine]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(lines)?)
}

/// Parse the stored form back into cart lines.
///
/// Duplicate product ids are merged by adding their quantities, and lines
/// with a zero quantity are dropped, so the result always satisfies the
/// one-line-per-product invariant.
///
/// # Errors
///
/// Returns the JSON error if `raw` is not an array of cart lines.
pub fn decode(raw: &str) -> Result<Vec<CartLine>, serde_json::Error> {
    let stored: Vec<CartLine> = serde_json::from_str(raw)?;
    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    for line in stored {
        if line.quantity == 0 {
            continue;
        }
        match lines.iter_mut().find(|l| l.id() == line.id()) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    Ok(lines)
}

/// Cart line items backed by local storage.
#[derive(Debug)]
pub struct CartStore<S> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: LocalStorage> CartStore<S> {
    /// Open the cart persisted in `storage`.
    ///
    /// Never fails: an absent, unreadable or malformed record yields an
    /// empty cart.
    #[instrument(skip(storage))]
    pub fn open(storage: S) -> Self {
        let lines = match storage.load(CART_KEY) {
            Ok(Some(raw)) => decode(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "stored cart is malformed, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "stored cart is unreadable, starting empty");
                Vec::new()
            }
        };
        debug!(lines = lines.len(), "cart opened");
        Self { lines, storage }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1, then persists the whole cart. Returns the updated
    /// quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the cart could not be persisted. The
    /// in-memory cart keeps the addition.
    pub fn add_item(&mut self, product: &Product) -> Result<u32, StorageError> {
        let quantity = if let Some(line) = self.lines.iter_mut().find(|l| l.id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            line.quantity
        } else {
            self.lines.push(CartLine::new(product.clone()));
            1
        };
        self.persist()?;
        Ok(quantity)
    }

    /// Remove every line and delete the persisted record.
    ///
    /// If the record cannot be deleted it is overwritten with an empty cart
    /// instead, so the cleared cart does not come back on the next start.
    ///
    /// # Errors
    ///
    /// Returns the deletion error if the record could neither be deleted nor
    /// overwritten. The in-memory cart is empty either way.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.lines.clear();
        match self.storage.remove(CART_KEY) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "stored cart could not be deleted, overwriting it");
                self.persist().map_err(|_| e)
            }
        }
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for `id`, if the product is in the cart.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let raw = encode(&self.lines)?;
        self.storage.save(CART_KEY, &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::Price;

    use super::*;

    fn product(id: u64, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_units(price),
            category: "misc".to_string(),
            image: format!("img/{id}.png"),
            description: "Test product".to_string(),
        }
    }

    /// Storage whose writes always fail.
    struct BrokenStorage;

    impl LocalStorage for BrokenStorage {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                path: "broken".into(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.load(CART_KEY).map(|_| ())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            self.load(CART_KEY).map(|_| ())
        }
    }

    /// Storage that can write records but never delete them.
    #[derive(Default)]
    struct UndeletableStorage(MemoryStorage);

    impl LocalStorage for UndeletableStorage {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.load(key)
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.save(key, value)
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "cart.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn test_adding_twice_aggregates() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let chair = product(1, 80);

        assert_eq!(cart.add_item(&chair).unwrap(), 1);
        assert_eq!(cart.add_item(&chair).unwrap(), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(chair.id).unwrap().quantity, 2);
        assert_eq!(cart.total_item_count(), 2);
    }

    #[test]
    fn test_totals() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&product(1, 80)).unwrap();
        cart.add_item(&product(2, 15)).unwrap();
        cart.add_item(&product(2, 15)).unwrap();

        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_price(), Decimal::from(110));
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut cart = CartStore::open(MemoryStorage::new());
        for id in [3, 1, 2, 1] {
            cart.add_item(&product(id, 1)).unwrap();
        }
        let ids: Vec<u64> = cart.snapshot().iter().map(|l| l.id().as_u64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&product(1, 10)).unwrap();
        cart.add_item(&product(1, 10)).unwrap();

        let raw = cart.storage().load(CART_KEY).unwrap().unwrap();
        assert_eq!(decode(&raw).unwrap(), cart.snapshot());
    }

    #[test]
    fn test_reopen_restores_cart() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&product(5, 10)).unwrap();
        cart.add_item(&product(7, 20)).unwrap();
        cart.add_item(&product(5, 10)).unwrap();
        let before = cart.snapshot().to_vec();

        let reopened = CartStore::open(cart.storage().clone());
        assert_eq!(reopened.snapshot(), before.as_slice());
    }

    #[test]
    fn test_round_trip() {
        let mut first = CartLine::new(product(9, 3));
        first.quantity = 4;
        let lines = vec![first, CartLine::new(product(2, 7))];

        let raw = encode(&lines).unwrap();
        assert_eq!(decode(&raw).unwrap(), lines);
    }

    #[test]
    fn test_decode_merges_duplicates_and_drops_empty_lines() {
        let raw = r#"[
            {"id":1,"name":"A","price":10,"category":"x","quantity":1},
            {"id":2,"name":"B","price":5,"category":"x","quantity":0},
            {"id":1,"name":"A","price":10,"category":"x","quantity":2}
        ]"#;
        let lines = decode(raw).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 3);
    }

    #[test]
    fn test_malformed_record_opens_empty() {
        let mut storage = MemoryStorage::new();
        storage.save(CART_KEY, "{not json").unwrap();
        let cart = CartStore::open(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unreadable_storage_opens_empty() {
        let cart = CartStore::open(BrokenStorage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_addition() {
        let mut cart = CartStore::open(BrokenStorage);
        assert!(cart.add_item(&product(1, 10)).is_err());
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn test_clear_removes_record() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&product(1, 10)).unwrap();
        cart.clear().unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.storage().load(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_overwrites_undeletable_record() {
        let mut cart = CartStore::open(UndeletableStorage::default());
        cart.add_item(&product(1, 10)).unwrap();
        cart.clear().unwrap();
        assert!(cart.is_empty());

        let stored = cart.storage().load(CART_KEY).unwrap().unwrap();
        assert!(decode(&stored).unwrap().is_empty());
        assert!(CartStore::open(UndeletableStorage(cart.storage().0.clone())).is_empty());
    }

    #[test]
    fn test_clear_fails_when_storage_is_broken() {
        let mut cart = CartStore::open(BrokenStorage);
        let _ = cart.add_item(&product(1, 10));
        assert!(cart.clear().is_err());
        assert!(cart.is_empty());
    }
}
