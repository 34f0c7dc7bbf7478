//! The cart state container.

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    items::{CartItem, ItemId},
    pricing::{checkout_total, payable_subtotal},
    promo::PromoCode,
};

/// What a mutating cart operation changed, reported so the container's owner
/// can fan out change notifications to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// The line collection changed.
    Items,
    /// The applied promo code changed.
    Promo,
    /// The whole cart was emptied, lines and promo code together.
    Cleared,
}

impl CartChange {
    /// Whether the change touched the line collection.
    pub fn touches_items(&self) -> bool {
        matches!(self, CartChange::Items | CartChange::Cleared)
    }
}

/// An ordered collection of cart lines plus the applied promo code.
///
/// Insertion order is preserved; it is meaningful for display only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    promo_code: Option<PromoCode>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, or merges its quantity into an existing line with the
    /// same id. Adding a zero-quantity line is a silent no-op.
    pub fn add_item(&mut self, item: CartItem) -> Option<CartChange> {
        if item.quantity() == 0 {
            return None;
        }

        match self.items.iter_mut().find(|line| line.id() == item.id()) {
            Some(line) => line.merge_quantity(item.quantity()),
            None => self.items.push(item),
        }

        Some(CartChange::Items)
    }

    /// Adjusts a line's quantity by a signed delta. A delta that would take
    /// the quantity non-positive, or an unknown id, is a silent no-op.
    pub fn adjust_quantity(&mut self, id: &ItemId, delta: i64) -> Option<CartChange> {
        let line = self.items.iter_mut().find(|line| line.id() == id)?;

        let adjusted = i64::from(line.quantity()) + delta;
        let adjusted = u32::try_from(adjusted).ok().filter(|qty| *qty > 0)?;

        line.set_quantity(adjusted);

        Some(CartChange::Items)
    }

    /// Removes every line matching the id. Removing an unknown id is a no-op.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<CartChange> {
        let before = self.items.len();
        self.items.retain(|line| line.id() != id);

        (self.items.len() != before).then_some(CartChange::Items)
    }

    /// Empties the cart and unsets the promo code.
    pub fn clear(&mut self) -> Option<CartChange> {
        if self.items.is_empty() && self.promo_code.is_none() {
            return None;
        }

        self.items.clear();
        self.promo_code = None;

        Some(CartChange::Cleared)
    }

    /// Applies a promo code, replacing any previous one.
    pub fn apply_promo(&mut self, promo: PromoCode) -> Option<CartChange> {
        self.promo_code = Some(promo);

        Some(CartChange::Promo)
    }

    /// Unsets the promo code. A no-op when none is applied.
    pub fn remove_promo(&mut self) -> Option<CartChange> {
        self.promo_code.take().map(|_| CartChange::Promo)
    }

    /// Removes and returns every wheel-gift line whose expiry has passed.
    /// Lines of any other kind are never touched.
    pub fn sweep_expired(&mut self, now: Timestamp) -> Vec<CartItem> {
        let (expired, kept) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|line| line.is_expired(now));

        self.items = kept;

        expired
    }

    /// Counts wheel-gift lines that have not yet expired but will within the
    /// given window.
    pub fn expiring_soon(&self, now: Timestamp, window: SignedDuration) -> usize {
        self.items
            .iter()
            .filter_map(|line| line.kind().expires_at())
            .filter(|expires_at| *expires_at > now && expires_at.duration_since(now) <= window)
            .count()
    }

    /// The checkout total: payable subtotal minus promo discount, never
    /// negative.
    pub fn total(&self) -> Decimal {
        checkout_total(&self.items, self.promo_code.as_ref())
    }

    /// The pre-discount payable subtotal.
    pub fn subtotal(&self) -> Decimal {
        payable_subtotal(&self.items)
    }

    /// All lines, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The payable lines, in insertion order.
    pub fn payable_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|line| line.is_payable())
    }

    /// Whether the cart holds at least one payable line.
    pub fn has_payable_items(&self) -> bool {
        self.items.iter().any(CartItem::is_payable)
    }

    /// The applied promo code, if any.
    pub fn promo_code(&self) -> Option<&PromoCode> {
        self.promo_code.as_ref()
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
