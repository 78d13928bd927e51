//! Cart and checkout commands.
//!
//! # Usage
//!
//! ```bash
//! vt cart add 17 --quantity 2
//! vt cart show
//! vt checkout --name "Anna" --phone "555-0100" --address "Main St 1"
//! vt cart clear
//! ```

use vitrine_core::{CheckoutForm, ProductId};
use vitrine_storefront::checkout::place_order;
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::error::AppError;
use vitrine_storefront::render::{CartSummary, Notice, Renderer};

use super::{CliError, load_catalog, open_cart, renderer};

/// Print the stored cart.
pub fn show(config: &StorefrontConfig) {
    let cart = open_cart(config);
    renderer(config).cart(&CartSummary::of(&cart));
}

/// Add `quantity` units of a catalog product to the stored cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the product does not
/// exist, or the cart cannot be saved.
pub async fn add(config: &StorefrontConfig, id: ProductId, quantity: u32) -> Result<(), CliError> {
    let store = load_catalog(config).await?;
    let product = store.get(id).ok_or(AppError::NotFound(id))?;

    let mut cart = open_cart(config);
    for _ in 0..quantity {
        cart.add_item(product)?;
    }
    tracing::info!(product_id = %id, quantity, "added to cart");

    renderer(config).cart(&CartSummary::of(&cart));
    Ok(())
}

/// Empty the stored cart.
///
/// # Errors
///
/// Returns an error if the stored cart cannot be deleted.
pub fn clear(config: &StorefrontConfig) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    cart.clear()?;
    renderer(config).cart(&CartSummary::of(&cart));
    Ok(())
}

/// Place a mock order for the stored cart.
///
/// A stored cart that cannot be emptied afterwards is reported as a notice;
/// the order still stands.
///
/// # Errors
///
/// Returns an error if a form field is empty; the cart is kept.
pub fn checkout(config: &StorefrontConfig, form: &CheckoutForm) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    let mut out = renderer(config);

    match place_order(&mut cart, form) {
        Ok(placed) => {
            out.notice(&Notice::OrderPlaced(Box::new(placed.confirmation)));
            if let Some(e) = placed.cart_error {
                out.notice(&Notice::CartNotSaved(AppError::from(e).user_message()));
            }
            Ok(())
        }
        Err(e) => {
            out.notice(&Notice::CheckoutRejected(e.clone()));
            Err(AppError::Checkout(e).into())
        }
    }
}
