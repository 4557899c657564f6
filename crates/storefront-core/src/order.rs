//! # Orders
//!
//! What checkout produces. Orders are never charged: the checkout flow is
//! simulated, so an `Order` is a receipt built from the cart snapshot at the
//! moment the form was accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{CartSnapshot, LineItem};
use crate::money::Money;

// =============================================================================
// Address & Payment
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Accepted payment kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    CreditCard,
    DebitCard,
    Paypal,
}

impl PaymentType {
    pub const ALL: [PaymentType; 3] = [
        PaymentType::CreditCard,
        PaymentType::DebitCard,
        PaymentType::Paypal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "credit_card",
            PaymentType::DebitCard => "debit_card",
            PaymentType::Paypal => "paypal",
        }
    }

    /// Parses the wire name (`credit_card`, `debit_card`, `paypal`).
    pub fn parse(s: &str) -> Option<PaymentType> {
        PaymentType::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment as recorded on an order: the kind, plus the last four card
/// digits when a card was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, not yet accepted.
    #[default]
    Pending,
    /// Accepted; what a simulated checkout produces.
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub shipping: Money,
    #[ts(type = "number")]
    pub total: Money,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Freezes `snapshot` into a new order with a fresh UUID.
    pub fn from_snapshot(
        snapshot: &CartSnapshot,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        status: OrderStatus,
    ) -> Self {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4().to_string(),
            items: snapshot.items.clone(),
            shipping_address,
            payment_method,
            subtotal: snapshot.totals.subtotal,
            tax: snapshot.totals.tax,
            shipping: snapshot.totals.shipping,
            total: snapshot.totals.total,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Σ quantity over the order's lines.
    pub fn total_items(&self) -> u32 {
        crate::totals::total_items(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::types::Product;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Jane Doe".into(),
            address: "456 Market St".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            zip_code: "94105".into(),
            country: "United States".into(),
        }
    }

    #[test]
    fn test_payment_type_round_trip_names() {
        assert_eq!(PaymentType::parse("credit_card"), Some(PaymentType::CreditCard));
        assert_eq!(PaymentType::parse("paypal"), Some(PaymentType::Paypal));
        assert_eq!(PaymentType::parse("cash"), None);
        assert_eq!(PaymentType::DebitCard.to_string(), "debit_card");
    }

    #[test]
    fn test_order_copies_snapshot_totals() {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("1", Money::from_cents(2999), 5), 2)
            .unwrap();
        let snapshot = cart.snapshot();

        let order = Order::from_snapshot(
            &snapshot,
            address(),
            PaymentMethod {
                kind: PaymentType::Paypal,
                last4: None,
            },
            OrderStatus::Processing,
        );

        assert_eq!(order.items, snapshot.items);
        assert_eq!(order.total, snapshot.totals.total);
        assert_eq!(order.total_items(), 2);
        assert!(Uuid::parse_str(&order.id).is_ok());
    }

    #[test]
    fn test_payment_method_json() {
        let json = serde_json::to_value(PaymentMethod {
            kind: PaymentType::CreditCard,
            last4: Some("1111".into()),
        })
        .unwrap();

        assert_eq!(json["type"], "credit_card");
        assert_eq!(json["last4"], "1111");
    }
}
