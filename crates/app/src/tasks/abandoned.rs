//! Abandoned-cart tracker.

use std::sync::Arc;

use jiff::Timestamp;
use tokio::{
    sync::watch,
    time::{Instant, MissedTickBehavior, interval_at},
};
use uuid::Uuid;

use crate::{
    activity::ActivityTracker,
    config::AbandonedTrackerConfig,
    domain::abandoned::{AbandonedCartsStore, AbandonedCartsStoreError, models::AbandonedCartSnapshot},
    store::SharedCart,
    tasks::TaskHandle,
};

/// Detects user inactivity and persists the cart as abandoned while payable
/// items remain.
///
/// Persistence is fire-and-forget: a store failure is logged and swallowed,
/// and the next interval simply tries again. There is no local
/// de-duplication — the store's session-keyed upsert absorbs repeats.
pub struct AbandonedCartTracker {
    cart: SharedCart,
    activity: Arc<ActivityTracker>,
    store: Arc<dyn AbandonedCartsStore>,
    session: Uuid,
    config: AbandonedTrackerConfig,
}

impl AbandonedCartTracker {
    /// Creates a tracker for the given session.
    pub fn new(
        cart: SharedCart,
        activity: Arc<ActivityTracker>,
        store: Arc<dyn AbandonedCartsStore>,
        session: Uuid,
        config: AbandonedTrackerConfig,
    ) -> Self {
        Self {
            cart,
            activity,
            store,
            session,
            config,
        }
    }

    /// Runs one idle check: when the session has been idle at least the
    /// configured delay and the cart holds payable items, upserts a snapshot.
    pub async fn check_once(&self, now: Timestamp) {
        if self.activity.idle_for(now) < self.config.delay() {
            return;
        }

        let snapshot = self
            .cart
            .read(|cart| AbandonedCartSnapshot::capture(self.session, cart, now));

        let Some(snapshot) = snapshot else {
            return;
        };

        tracing::debug!(
            session = %self.session,
            items = snapshot.items.len(),
            "persisting abandoned cart"
        );

        if let Err(error) = self.store.upsert_abandoned_cart(snapshot).await {
            tracing::warn!(%error, session = %self.session, "failed to persist abandoned cart");
        }
    }

    /// Flags this session's abandoned record as recovered. Called by the
    /// checkout completion flow.
    ///
    /// # Errors
    ///
    /// Returns [`AbandonedCartsStoreError::NotFound`] when the session has no
    /// unrecovered record, or a storage error when the update fails.
    pub async fn mark_as_recovered(&self) -> Result<(), AbandonedCartsStoreError> {
        self.store.mark_cart_as_recovered(self.session).await
    }

    /// Spawns the tracker loop. The first check fires one interval in.
    pub fn spawn(self: Arc<Self>) -> TaskHandle {
        let (shutdown, mut stop) = watch::channel(false);

        let join = tokio::spawn(async move {
            let check_interval = self.config.check_interval();
            let mut check = interval_at(Instant::now() + check_interval, check_interval);
            check.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = check.tick() => self.check_once(Timestamp::now()).await,
                    _ = stop.changed() => break,
                }
            }

            tracing::debug!("abandoned-cart tracker stopped");
        });

        TaskHandle::new(shutdown, join)
    }
}

#[cfg(test)]
mod tests {
    use aquareve::CartItem;
    use jiff::ToSpan;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::domain::abandoned::MockAbandonedCartsStore;

    use super::*;

    fn tracker_with(
        cart: SharedCart,
        activity: ActivityTracker,
        store: MockAbandonedCartsStore,
        session: Uuid,
    ) -> AbandonedCartTracker {
        AbandonedCartTracker::new(
            cart,
            Arc::new(activity),
            Arc::new(store),
            session,
            AbandonedTrackerConfig::default(),
        )
    }

    #[tokio::test]
    async fn idle_session_with_payable_item_is_persisted_once_per_check() -> TestResult {
        let now = Timestamp::now();
        let session = Uuid::now_v7();

        let cart = SharedCart::new();
        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));

        let activity = ActivityTracker::starting_at(now.checked_sub(31.minutes())?);

        let mut store = MockAbandonedCartsStore::new();
        store
            .expect_upsert_abandoned_cart()
            .withf(move |snapshot| snapshot.session == session && snapshot.items.len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        tracker_with(cart, activity, store, session)
            .check_once(now)
            .await;

        Ok(())
    }

    #[tokio::test]
    async fn active_session_is_not_persisted() -> TestResult {
        let now = Timestamp::now();

        let cart = SharedCart::new();
        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));

        let activity = ActivityTracker::starting_at(now.checked_sub(10.minutes())?);

        let mut store = MockAbandonedCartsStore::new();
        store.expect_upsert_abandoned_cart().times(0);

        tracker_with(cart, activity, store, Uuid::now_v7())
            .check_once(now)
            .await;

        Ok(())
    }

    #[tokio::test]
    async fn gift_only_cart_is_not_persisted() -> TestResult {
        let now = Timestamp::now();

        let cart = SharedCart::new();
        cart.add_item(CartItem::wheel_gift("G", now.checked_add(1.hour())?));
        cart.add_item(CartItem::threshold_gift("free-net"));

        let activity = ActivityTracker::starting_at(now.checked_sub(2.hours())?);

        let mut store = MockAbandonedCartsStore::new();
        store.expect_upsert_abandoned_cart().times(0);

        tracker_with(cart, activity, store, Uuid::now_v7())
            .check_once(now)
            .await;

        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() -> TestResult {
        let now = Timestamp::now();

        let cart = SharedCart::new();
        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));

        let activity = ActivityTracker::starting_at(now.checked_sub(31.minutes())?);

        let mut store = MockAbandonedCartsStore::new();
        store
            .expect_upsert_abandoned_cart()
            .times(1)
            .returning(|_| Err(AbandonedCartsStoreError::NotFound));

        // Must not panic or propagate.
        tracker_with(cart, activity, store, Uuid::now_v7())
            .check_once(now)
            .await;

        Ok(())
    }

    #[tokio::test]
    async fn cart_changes_reset_the_idle_clock() -> TestResult {
        let now = Timestamp::now();

        let cart = SharedCart::new();
        let activity = Arc::new(ActivityTracker::starting_at(now.checked_sub(31.minutes())?));
        cart.register_observer(activity.clone());

        // The add is user activity; the session is no longer idle.
        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));

        let mut store = MockAbandonedCartsStore::new();
        store.expect_upsert_abandoned_cart().times(0);

        let tracker = AbandonedCartTracker::new(
            cart,
            activity,
            Arc::new(store),
            Uuid::now_v7(),
            AbandonedTrackerConfig::default(),
        );
        tracker.check_once(now).await;

        Ok(())
    }

    #[tokio::test]
    async fn mark_as_recovered_delegates_to_the_store() -> TestResult {
        let session = Uuid::now_v7();

        let mut store = MockAbandonedCartsStore::new();
        store
            .expect_mark_cart_as_recovered()
            .withf(move |requested| *requested == session)
            .times(1)
            .returning(|_| Ok(()));

        let tracker = tracker_with(
            SharedCart::new(),
            ActivityTracker::new(),
            store,
            session,
        );

        tracker.mark_as_recovered().await?;

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_tracker_stops_before_its_first_check() {
        let mut store = MockAbandonedCartsStore::new();
        store.expect_upsert_abandoned_cart().times(0);

        let tracker = Arc::new(tracker_with(
            SharedCart::new(),
            ActivityTracker::new(),
            store,
            Uuid::now_v7(),
        ));

        let handle = tracker.spawn();
        handle.stop().await;
    }
}
