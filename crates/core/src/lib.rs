//! Aqua Rêve cart engine
//!
//! The pure, synchronous core of the Aqua Rêve storefront cart: ordered line
//! items with gift kinds, promo codes, derived totals, and the expiry
//! computations the runtime's background tasks are built on.

pub mod cart;
pub mod items;
pub mod pricing;
pub mod promo;

pub use cart::{Cart, CartChange};
pub use items::{CartItem, ItemId, ItemKind};
pub use promo::{PromoCode, PromoEffect, PromoError};
