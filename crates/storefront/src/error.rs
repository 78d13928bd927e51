//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for every user-facing entry point.
//! Infrastructure failures are captured to Sentry before they are reported;
//! validation failures are not.

use thiserror::Error;
use vitrine_core::{CheckoutError, ProductId};

use crate::cart::StorageError;
use crate::catalog::FeedError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Fetching the product feed failed.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The checkout form was incomplete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// No product with this id in the catalog.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// The catalog has not been loaded yet.
    #[error("Catalog not loaded")]
    CatalogUnavailable,

    /// The catalog is fetched once per session.
    #[error("Catalog already loaded")]
    AlreadyLoaded,
}

impl AppError {
    /// Whether this error comes from infrastructure rather than user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Feed(_) | Self::Storage(_))
    }

    /// Message safe to show to the user.
    ///
    /// Internal details (paths, HTTP errors, parse positions) stay in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Feed(_) => "The product catalog could not be loaded".to_string(),
            Self::Storage(_) => "Your cart could not be saved".to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(id) => format!("Product {id} was not found"),
            Self::CatalogUnavailable => "The product catalog is not available".to_string(),
            Self::AlreadyLoaded => "The product catalog is already loaded".to_string(),
        }
    }

    /// Log the error and, for internal errors, capture it to Sentry.
    pub fn capture(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "rejected user action");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use vitrine_core::CheckoutField;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::Checkout(CheckoutError::MissingFields(vec![CheckoutField::Phone]));
        assert_eq!(
            err.to_string(),
            "Checkout error: please fill in all fields (missing: phone)"
        );
    }

    #[test]
    fn test_user_message_hides_internal_details() {
        let err = AppError::Storage(StorageError::Io {
            path: "/home/anna/.vitrine/cart.json".into(),
            source: std::io::Error::other("permission denied"),
        });
        assert!(err.is_internal());
        let message = err.user_message();
        assert!(!message.contains("/home/anna"));
        assert!(!message.contains("permission denied"));
    }

    #[test]
    fn test_validation_errors_are_not_internal() {
        let err = AppError::Checkout(CheckoutError::MissingFields(vec![CheckoutField::Name]));
        assert!(!err.is_internal());
        assert_eq!(err.user_message(), "please fill in all fields (missing: name)");
        assert!(!AppError::NotFound(ProductId::new(1)).is_internal());
    }

    #[test]
    fn test_capture_without_client_is_noop() {
        AppError::CatalogUnavailable.capture();
        AppError::Feed(FeedError::Status(503)).capture();
    }
}
