//! Abandoned Cart Models

use aquareve::Cart;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One payable line inside a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// The cart state persisted when a session goes idle: payable lines only,
/// keyed by the session UUID.
#[derive(Debug, Clone, PartialEq)]
pub struct AbandonedCartSnapshot {
    pub session: Uuid,
    pub items: Vec<SnapshotItem>,
    pub total: Decimal,
    pub captured_at: Timestamp,
}

impl AbandonedCartSnapshot {
    /// Captures the payable lines of a cart. Returns `None` when the cart has
    /// no payable lines — gift-only carts are never persisted as abandoned.
    pub fn capture(session: Uuid, cart: &Cart, now: Timestamp) -> Option<Self> {
        let items: Vec<SnapshotItem> = cart
            .payable_items()
            .map(|line| SnapshotItem {
                id: line.id().to_string(),
                quantity: line.quantity(),
                unit_price: line.unit_price(),
            })
            .collect();

        if items.is_empty() {
            return None;
        }

        Some(Self {
            session,
            items,
            total: cart.total(),
            captured_at: now,
        })
    }
}

/// A persisted abandoned-cart row.
#[derive(Debug, Clone)]
pub struct AbandonedCartRecord {
    pub session: Uuid,
    pub items: Vec<SnapshotItem>,
    pub total: Decimal,
    pub captured_at: Timestamp,
    pub updated_at: Timestamp,
    pub recovered: bool,
}

#[cfg(test)]
mod tests {
    use aquareve::CartItem;
    use jiff::ToSpan;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn capture_keeps_payable_lines_only() -> TestResult {
        let now = Timestamp::now();
        let mut cart = Cart::new();
        cart.add_item(CartItem::normal("heater", dec!(24.90), 2));
        cart.add_item(CartItem::wheel_gift("wheel-shrimp", now.checked_add(1.hour())?));
        cart.add_item(CartItem::threshold_gift("free-net"));

        let session = Uuid::now_v7();
        let snapshot =
            AbandonedCartSnapshot::capture(session, &cart, now).expect("expected a snapshot");

        assert_eq!(snapshot.session, session);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(
            snapshot.items.first().map(|item| item.id.as_str()),
            Some("heater")
        );
        assert_eq!(snapshot.total, dec!(49.80));
        assert_eq!(snapshot.captured_at, now);

        Ok(())
    }

    #[test]
    fn gift_only_carts_are_not_captured() -> TestResult {
        let now = Timestamp::now();
        let mut cart = Cart::new();
        cart.add_item(CartItem::wheel_gift("wheel-shrimp", now.checked_add(1.hour())?));

        let snapshot = AbandonedCartSnapshot::capture(Uuid::now_v7(), &cart, now);

        assert_eq!(snapshot, None);

        Ok(())
    }

    #[test]
    fn empty_carts_are_not_captured() {
        let snapshot =
            AbandonedCartSnapshot::capture(Uuid::now_v7(), &Cart::new(), Timestamp::now());

        assert_eq!(snapshot, None);
    }
}
