//! Checkout completion flow.

use std::sync::Arc;

use crate::{
    domain::abandoned::AbandonedCartsStoreError, store::SharedCart, tasks::AbandonedCartTracker,
};

/// Entry point the external payment webhook calls once an order has been
/// materialized: clears the cart and flags the session's abandoned record as
/// recovered. The two effects are separate calls; a recovery-marking failure
/// never blocks the cart from clearing.
pub struct CheckoutCompletion {
    cart: SharedCart,
    tracker: Arc<AbandonedCartTracker>,
}

impl CheckoutCompletion {
    /// Creates the completion flow over the session's cart and tracker.
    pub fn new(cart: SharedCart, tracker: Arc<AbandonedCartTracker>) -> Self {
        Self { cart, tracker }
    }

    /// Completes checkout for the session.
    pub async fn complete(&self) {
        self.cart.clear();

        match self.tracker.mark_as_recovered().await {
            Ok(()) => tracing::info!("abandoned cart marked as recovered"),
            Err(AbandonedCartsStoreError::NotFound) => {
                // Checkout without a prior abandonment; nothing to flag.
                tracing::debug!("no abandoned cart to mark as recovered");
            }
            Err(error) => {
                tracing::warn!(%error, "failed to mark abandoned cart as recovered");
            }
        }
    }
}
