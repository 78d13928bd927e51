//! Mock checkout.
//!
//! Placing an order validates the form, snapshots the cart into an
//! [`OrderConfirmation`] and empties the cart. Nothing leaves the process.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use vitrine_core::{CartLine, CheckoutDetails, CheckoutError, CheckoutForm};

use crate::cart::{CartStore, LocalStorage, StorageError};

/// Acknowledgment of a placed (mock) order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub customer: CheckoutDetails,
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub total: Decimal,
}

/// An order that was placed, plus the outcome of emptying the stored cart.
#[derive(Debug)]
pub struct PlacedOrder {
    pub confirmation: OrderConfirmation,
    /// Set when the stored cart could not be emptied. The order still stands.
    pub cart_error: Option<StorageError>,
}

/// Validate `form` and convert the cart into an order.
///
/// The cart is emptied once the order is placed. A storage failure while
/// doing so does not undo the order; it is reported in
/// [`PlacedOrder::cart_error`].
///
/// # Errors
///
/// Returns [`CheckoutError`] if a required field is empty; the cart is left
/// untouched.
#[instrument(skip_all)]
pub fn place_order<S: LocalStorage>(
    cart: &mut CartStore<S>,
    form: &CheckoutForm,
) -> Result<PlacedOrder, CheckoutError> {
    let customer = form.validate()?;

    let confirmation = OrderConfirmation {
        order_id: Uuid::new_v4(),
        placed_at: Utc::now(),
        customer,
        lines: cart.snapshot().to_vec(),
        item_count: cart.total_item_count(),
        total: cart.total_price(),
    };

    info!(
        order_id = %confirmation.order_id,
        items = confirmation.item_count,
        total = %confirmation.total,
        "order placed"
    );

    let cart_error = cart.clear().err();
    if let Some(e) = &cart_error {
        warn!(order_id = %confirmation.order_id, error = %e, "stored cart was not emptied");
    }
    Ok(PlacedOrder {
        confirmation,
        cart_error,
    })
}
