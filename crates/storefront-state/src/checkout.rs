//! # Checkout
//!
//! Turns the current cart plus a submitted checkout form into an [`Order`].
//!
//! ```text
//! CheckoutFormInput ──► parse_checkout_form ──► FieldErrors? ──► InvalidCheckout
//!                                │
//!                                ▼
//!                      store.take()  (EmptyCart if nothing to buy)
//!                                │
//!                                ▼
//!                      Order::from_snapshot(.., Processing)
//! ```
//!
//! The cart is emptied and the empty cart saved in the same locked step that
//! reads it, so the order holds exactly what the customer saw.

use storefront_core::validation::parse_checkout_form;
use storefront_core::{CheckoutFormInput, Order, OrderStatus};
use tracing::{debug, info};

use crate::cart::PersistentCartStore;
use crate::error::{StateError, StateResult};

/// Validates `input` and converts the cart into an order.
///
/// ## Errors
/// - `EmptyCart` when the cart holds nothing
/// - `InvalidCheckout` with every failing field when the form is rejected
/// - `Storage` when the emptied cart could not be saved; the cart is kept
pub async fn place_order(store: &PersistentCartStore, input: CheckoutFormInput) -> StateResult<Order> {
    if store.snapshot().await.is_empty() {
        return Err(StateError::EmptyCart);
    }

    let form = parse_checkout_form(input).map_err(|errors| {
        debug!(issues = errors.issues.len(), "Checkout form rejected");
        StateError::InvalidCheckout(errors)
    })?;

    let snapshot = store.take().await?;
    let order = Order::from_snapshot(
        &snapshot,
        form.shipping_address,
        form.payment.to_payment_method(),
        OrderStatus::Processing,
    );

    info!(
        order_id = %order.id,
        items = order.total_items(),
        total = %order.total,
        payment = %order.payment_method.kind,
        "Order placed"
    );

    Ok(order)
}
