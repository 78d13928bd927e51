//! End-to-end test fixtures for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! Every test gets its own temporary directory holding a feed file and the
//! cart storage, so tests run in parallel without sharing state. HTTP feeds
//! are served by [`serve_once`] on a loopback port.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use vitrine_core::{Price, Product, ProductId};
use vitrine_storefront::cart::FileStorage;
use vitrine_storefront::catalog::FileFeed;
use vitrine_storefront::render::TextRenderer;
use vitrine_storefront::state::AppState;

/// Session type used throughout the tests.
pub type TestSession = AppState<FileStorage, TextRenderer<Vec<u8>>>;

/// Build a product with an empty image and description.
#[must_use]
pub fn product(id: u64, name: &str, price: u32, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_units(price),
        category: category.to_string(),
        image: String::new(),
        description: String::new(),
    }
}

/// `count` products named "Item 1".."Item n", alternating categories.
#[must_use]
pub fn numbered(count: u64) -> Vec<Product> {
    (1..=count)
        .map(|i| {
            let category = if i % 2 == 0 { "even" } else { "odd" };
            product(i, &format!("Item {i}"), 10, category)
        })
        .collect()
}

/// A temporary shop: a feed file and a data directory.
pub struct TestShop {
    dir: TempDir,
}

impl TestShop {
    /// Create a shop whose feed contains `products`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or feed file cannot be written.
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        let shop = Self::empty();
        let body = serde_json::to_string(products).expect("serialize products");
        shop.write_feed(&body);
        shop
    }

    /// Create a shop without a feed file.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Replace the feed file contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_feed(&self, body: &str) {
        std::fs::write(self.feed_path(), body).expect("write feed");
    }

    #[must_use]
    pub fn feed_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    #[must_use]
    pub fn feed(&self) -> FileFeed {
        FileFeed::new(self.feed_path())
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("storage")
    }

    /// Path of the persisted cart record.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.data_dir().join("cart.json")
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Start a session over this shop's storage, without loading the catalog.
    #[must_use]
    pub fn open(&self) -> TestSession {
        AppState::new(
            FileStorage::new(self.data_dir()),
            TextRenderer::new(Vec::new(), "RUB"),
        )
    }

    /// Start a session and load the catalog from the feed file.
    ///
    /// # Panics
    ///
    /// Panics if the catalog fails to load.
    pub async fn start(&self) -> TestSession {
        let mut session = self.open();
        session
            .load_catalog(&self.feed())
            .await
            .expect("load catalog");
        session
    }
}

/// Everything the session has rendered so far.
#[must_use]
pub fn rendered(session: &TestSession) -> String {
    String::from_utf8_lossy(session.renderer().writer()).into_owned()
}

/// Serve one HTTP response on a loopback port and return its URL.
///
/// # Panics
///
/// Panics if no loopback port can be bound.
pub async fn serve_once(status: u16, body: String) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0_u8; 1024];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Url::parse(&format!("http://{addr}/data.json")).expect("loopback url")
}
