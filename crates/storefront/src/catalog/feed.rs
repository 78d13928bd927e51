//! Product feed providers.
//!
//! The feed is a single JSON array of product objects, read once at startup
//! either over HTTP or from a local file.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;
use vitrine_core::Product;

/// Errors that can occur while fetching the product feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("feed returned HTTP {0}")]
    Status(u16),

    /// Reading the feed file failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The body is not a JSON array of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of the product list.
pub trait ProductFeed {
    /// Fetch the full, ordered product list.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Product>, FeedError>> + Send;
}

/// Where the product feed lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(Url),
    Path(PathBuf),
}

impl FeedSource {
    /// Interpret `value` as an `http(s)` URL, or else as a file path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::Path(PathBuf::from(value)),
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse a feed body.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the body is not a JSON array of products.
pub fn parse_products(body: &str) -> Result<Vec<Product>, FeedError> {
    Ok(serde_json::from_str(body)?)
}

/// Product feed served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    url: Url,
}

impl HttpFeed {
    /// Create a feed client with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

impl ProductFeed for HttpFeed {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<Product>, FeedError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        // Read as text first so parse errors point into the body
        let body = response.text().await?;
        debug!(bytes = body.len(), "feed downloaded");
        parse_products(&body)
    }
}

/// Product feed stored in a local JSON file.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductFeed for FileFeed {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Vec<Product>, FeedError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(bytes = body.len(), "feed read");
        parse_products(&body)
    }
}

/// A feed chosen at runtime from a [`FeedSource`].
#[derive(Debug, Clone)]
pub enum Feed {
    Http(HttpFeed),
    File(FileFeed),
}

impl Feed {
    /// Build the matching feed for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn from_source(source: &FeedSource, timeout: Duration) -> Result<Self, FeedError> {
        Ok(match source {
            FeedSource::Url(url) => Self::Http(HttpFeed::new(url.clone(), timeout)?),
            FeedSource::Path(path) => Self::File(FileFeed::new(path.clone())),
        })
    }
}

impl ProductFeed for Feed {
    async fn fetch(&self) -> Result<Vec<Product>, FeedError> {
        match self {
            Self::Http(feed) => feed.fetch().await,
            Self::File(feed) => feed.fetch().await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_feed_source_parse() {
        assert!(matches!(
            FeedSource::parse("https://shop.example/data.json"),
            FeedSource::Url(_)
        ));
        assert_eq!(
            FeedSource::parse("data.json"),
            FeedSource::Path(PathBuf::from("data.json"))
        );
        // Non-HTTP schemes are treated as paths
        assert!(matches!(
            FeedSource::parse("C:/feeds/data.json"),
            FeedSource::Path(_)
        ));
    }

    #[test]
    fn test_parse_products_rejects_object() {
        let err = parse_products(r#"{"products":[]}"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn test_file_feed_reads_products() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":1,"name":"Chair","price":80,"category":"furniture","image":"chair.jpg","description":"Oak"}}]"#
        )
        .unwrap();

        let products = FileFeed::new(file.path()).fetch().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().name, "Chair");
    }

    #[tokio::test]
    async fn test_file_feed_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileFeed::new(dir.path().join("missing.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
    }

    #[tokio::test]
    async fn test_feed_dispatches_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let source = FeedSource::Path(file.path().to_path_buf());

        let feed = Feed::from_source(&source, Duration::from_secs(1)).unwrap();
        assert!(feed.fetch().await.unwrap().is_empty());
    }
}
