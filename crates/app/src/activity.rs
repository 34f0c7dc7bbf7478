//! User activity tracking for abandoned-cart detection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use aquareve::CartChange;
use jiff::{SignedDuration, Timestamp};

use crate::store::CartObserver;

/// The fixed set of interaction kinds that count as activity, mirroring the
/// storefront's document-wide capture-phase listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Pointer movement.
    Pointer,
    /// Key press.
    Key,
    /// Page scroll.
    Scroll,
    /// Touch start.
    Touch,
    /// Click.
    Click,
}

/// Tracks the timestamp of the last user interaction. Any cart line change
/// also counts as activity, so the tracker registers as a cart observer.
pub struct ActivityTracker {
    last_activity: Mutex<Timestamp>,
}

impl ActivityTracker {
    /// Creates a tracker whose idle clock starts now.
    pub fn new() -> Self {
        Self::starting_at(Timestamp::now())
    }

    /// Creates a tracker with an explicit starting point.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            last_activity: Mutex::new(start),
        }
    }

    /// Records an interaction happening now.
    pub fn record(&self, kind: ActivityKind) {
        self.record_at(kind, Timestamp::now());
    }

    /// Records an interaction at the given time.
    pub fn record_at(&self, kind: ActivityKind, at: Timestamp) {
        tracing::trace!(?kind, "user activity");
        *self.lock() = at;
    }

    /// The timestamp of the most recent activity.
    pub fn last_activity(&self) -> Timestamp {
        *self.lock()
    }

    /// How long the user has been idle as of `now`.
    pub fn idle_for(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.last_activity())
    }

    fn lock(&self) -> MutexGuard<'_, Timestamp> {
        self.last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CartObserver for ActivityTracker {
    fn on_cart_changed(&self, change: CartChange) {
        if change.touches_items() {
            *self.lock() = Timestamp::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn idle_time_grows_from_last_activity() -> TestResult {
        let start = Timestamp::now();
        let tracker = ActivityTracker::starting_at(start);

        let later = start.checked_add(31.minutes())?;
        assert_eq!(tracker.idle_for(later), SignedDuration::from_mins(31));

        Ok(())
    }

    #[test]
    fn recording_activity_resets_the_idle_clock() -> TestResult {
        let start = Timestamp::now();
        let tracker = ActivityTracker::starting_at(start);

        let scrolled_at = start.checked_add(20.minutes())?;
        tracker.record_at(ActivityKind::Scroll, scrolled_at);

        let checked_at = start.checked_add(35.minutes())?;
        assert_eq!(tracker.idle_for(checked_at), SignedDuration::from_mins(15));

        Ok(())
    }

    #[test]
    fn record_uses_the_current_time() -> TestResult {
        let long_ago = Timestamp::now().checked_sub(2.hours())?;
        let tracker = ActivityTracker::starting_at(long_ago);

        tracker.record(ActivityKind::Click);

        assert!(
            tracker.idle_for(Timestamp::now()) < SignedDuration::from_mins(1),
            "idle clock should reset on recorded activity"
        );

        Ok(())
    }

    #[test]
    fn item_changes_reset_the_idle_clock() -> TestResult {
        let long_ago = Timestamp::now().checked_sub(2.hours())?;
        let tracker = ActivityTracker::starting_at(long_ago);

        tracker.on_cart_changed(CartChange::Items);

        assert!(
            tracker.idle_for(Timestamp::now()) < SignedDuration::from_mins(1),
            "idle clock should reset on item changes"
        );

        Ok(())
    }

    #[test]
    fn promo_changes_do_not_count_as_activity() -> TestResult {
        let start = Timestamp::now().checked_sub(2.hours())?;
        let tracker = ActivityTracker::starting_at(start);

        tracker.on_cart_changed(CartChange::Promo);

        assert_eq!(tracker.last_activity(), start);

        Ok(())
    }
}
