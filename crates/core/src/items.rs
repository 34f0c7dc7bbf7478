//! Cart line items.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier for a cart line: the product id, or a synthetic id for gifts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an item id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The kind of a cart line.
///
/// A wheel gift always carries its expiry; other kinds never do. Encoding the
/// timestamp inside the variant makes an expiry-less wheel gift unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    /// A regular, payable product line.
    Normal,
    /// A free item granted by the promotional wheel, valid until `expires_at`.
    WheelGift {
        /// Hard expiry for the granted gift.
        expires_at: Timestamp,
    },
    /// A free item granted by crossing a spend threshold.
    ThresholdGift,
}

impl ItemKind {
    /// Whether this kind represents a free item of any sort.
    pub fn is_gift(&self) -> bool {
        !matches!(self, ItemKind::Normal)
    }

    /// The gift expiry, present only for wheel gifts.
    pub fn expires_at(&self) -> Option<Timestamp> {
        match self {
            ItemKind::WheelGift { expires_at } => Some(*expires_at),
            ItemKind::Normal | ItemKind::ThresholdGift => None,
        }
    }
}

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    id: ItemId,
    quantity: u32,
    unit_price: Decimal,
    kind: ItemKind,
}

impl CartItem {
    /// Creates a payable product line.
    pub fn normal(id: impl Into<ItemId>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
            unit_price,
            kind: ItemKind::Normal,
        }
    }

    /// Creates a wheel gift line, free of charge, expiring at the given time.
    pub fn wheel_gift(id: impl Into<ItemId>, expires_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            quantity: 1,
            unit_price: Decimal::ZERO,
            kind: ItemKind::WheelGift { expires_at },
        }
    }

    /// Creates a threshold gift line, free of charge.
    pub fn threshold_gift(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            quantity: 1,
            unit_price: Decimal::ZERO,
            kind: ItemKind::ThresholdGift,
        }
    }

    /// Returns the line id.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the line quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit price.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the line kind.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Whether this line counts towards the checkout total.
    pub fn is_payable(&self) -> bool {
        !self.kind.is_gift()
    }

    /// Price × quantity for this line; zero for gifts.
    pub fn line_total(&self) -> Decimal {
        if self.is_payable() {
            self.unit_price * Decimal::from(self.quantity)
        } else {
            Decimal::ZERO
        }
    }

    /// Whether this line is a wheel gift whose expiry has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.kind.expires_at() {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    pub(crate) fn merge_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
