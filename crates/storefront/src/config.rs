//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_FEED` - Product feed, an `http(s)` URL or a file path (default: data.json)
//! - `VITRINE_DATA_DIR` - Directory for the persisted cart (default: .vitrine)
//! - `VITRINE_FEED_TIMEOUT_SECS` - HTTP timeout for the feed (default: 10)
//! - `VITRINE_CURRENCY` - Label printed after prices (default: RUB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::FeedSource;

const DEFAULT_FEED: &str = "data.json";
const DEFAULT_DATA_DIR: &str = ".vitrine";
const DEFAULT_FEED_TIMEOUT_SECS: &str = "10";
const DEFAULT_CURRENCY: &str = "RUB";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the product list is fetched from
    pub feed: FeedSource,
    /// Directory holding the persisted cart
    pub data_dir: PathBuf,
    /// Timeout for fetching an HTTP feed
    pub feed_timeout: Duration,
    /// Currency label for prices
    pub currency: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let feed = FeedSource::parse(&env.or_default("VITRINE_FEED", DEFAULT_FEED));
        let data_dir = PathBuf::from(env.or_default("VITRINE_DATA_DIR", DEFAULT_DATA_DIR));
        let timeout_secs: u64 =
            env.parse_or_default("VITRINE_FEED_TIMEOUT_SECS", DEFAULT_FEED_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_FEED_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let currency = env.or_default("VITRINE_CURRENCY", DEFAULT_CURRENCY);

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.rate("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = env.rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            feed,
            data_dir,
            feed_timeout: Duration::from_secs(timeout_secs),
            currency,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Replace the feed source.
    #[must_use]
    pub fn with_feed(mut self, feed: FeedSource) -> Self {
        self.feed = feed;
        self
    }

    /// Replace the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default`.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a sample rate in `0.0..=1.0`.
    fn rate(&self, key: &str, default: &str) -> Result<f32, ConfigError> {
        let rate: f32 = self.parse_or_default(key, default)?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.feed, FeedSource::Path(PathBuf::from("data.json")));
        assert_eq!(config.data_dir, PathBuf::from(".vitrine"));
        assert_eq!(config.feed_timeout, Duration::from_secs(10));
        assert_eq!(config.currency, "RUB");
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(config.sentry_traces_sample_rate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_url_feed() {
        let config = load(&[("VITRINE_FEED", "https://shop.example.com/data.json")]).unwrap();
        assert!(matches!(config.feed, FeedSource::Url(_)));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VITRINE_FEED", "catalog/products.json"),
            ("VITRINE_DATA_DIR", "/tmp/vitrine"),
            ("VITRINE_FEED_TIMEOUT_SECS", " 3 "),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_ENVIRONMENT", "staging"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();
        assert_eq!(config.feed, FeedSource::Path(PathBuf::from("catalog/products.json")));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/vitrine"));
        assert_eq!(config.feed_timeout, Duration::from_secs(3));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = load(&[("VITRINE_FEED", ""), ("SENTRY_DSN", "  ")]).unwrap();
        assert_eq!(config.feed, FeedSource::Path(PathBuf::from("data.json")));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[("VITRINE_FEED_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "VITRINE_FEED_TIMEOUT_SECS"));

        let err = load(&[("VITRINE_FEED_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let err = load(&[("SENTRY_SAMPLE_RATE", "1.5")]).unwrap_err();
        assert!(err.to_string().contains("SENTRY_SAMPLE_RATE"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = load(&[])
            .unwrap()
            .with_feed(FeedSource::parse("http://localhost:8000/data.json"))
            .with_data_dir("/var/lib/vitrine");
        assert!(matches!(config.feed, FeedSource::Url(_)));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/vitrine"));
    }
}
