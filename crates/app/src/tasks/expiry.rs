//! Gift expiry monitor.

use std::sync::Arc;

use jiff::Timestamp;
use tokio::{
    sync::watch,
    time::{Instant, MissedTickBehavior, interval, interval_at},
};

use crate::{
    config::ExpiryMonitorConfig,
    notify::{Notifier, Toast, ToastVariant},
    store::SharedCart,
    tasks::TaskHandle,
};

/// Periodically evicts expired wheel gifts and warns about gifts close to
/// expiring.
///
/// The sweep and warning tickers are independent; they may fire in the same
/// scheduling round and their ordering is unspecified. The warning scan keeps
/// no "already warned" state, so a gift still inside the window is re-warned
/// on every scan.
pub struct GiftExpiryMonitor {
    cart: SharedCart,
    notifier: Arc<dyn Notifier>,
    config: ExpiryMonitorConfig,
}

impl GiftExpiryMonitor {
    /// Creates a monitor over the given cart and notification channel.
    pub fn new(cart: SharedCart, notifier: Arc<dyn Notifier>, config: ExpiryMonitorConfig) -> Self {
        Self {
            cart,
            notifier,
            config,
        }
    }

    /// Runs one sweep: evicts expired wheel gifts and, when any were evicted,
    /// emits a single toast naming the count.
    pub fn sweep_once(&self, now: Timestamp) {
        let removed = self.cart.sweep_expired(now);

        if removed.is_empty() {
            return;
        }

        let count = removed.len();
        tracing::info!(count, "evicted expired wheel gifts");

        self.notifier.notify(Toast::new(
            "Gift expired",
            removal_message(count),
            ToastVariant::Destructive,
        ));
    }

    /// Runs one warning scan: emits a single toast when any wheel gift is
    /// inside the warning window.
    pub fn warn_once(&self, now: Timestamp) {
        let count = self.cart.expiring_soon(now, self.config.warning_window());

        if count == 0 {
            return;
        }

        self.notifier.notify(Toast::new(
            "Gift expiring soon",
            warning_message(count),
            ToastVariant::Warning,
        ));
    }

    /// Spawns the monitor loop. The first sweep fires immediately; the first
    /// warning scan fires one warning interval in.
    pub fn spawn(self) -> TaskHandle {
        let (shutdown, mut stop) = watch::channel(false);

        let join = tokio::spawn(async move {
            let mut sweep = interval(self.config.sweep_interval());
            sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let warning_interval = self.config.warning_interval();
            let mut warn = interval_at(Instant::now() + warning_interval, warning_interval);
            warn.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = sweep.tick() => self.sweep_once(Timestamp::now()),
                    _ = warn.tick() => self.warn_once(Timestamp::now()),
                    _ = stop.changed() => break,
                }
            }

            tracing::debug!("gift expiry monitor stopped");
        });

        TaskHandle::new(shutdown, join)
    }
}

fn removal_message(count: usize) -> String {
    if count == 1 {
        "1 expired gift was removed from your cart".to_string()
    } else {
        format!("{count} expired gifts were removed from your cart")
    }
}

fn warning_message(count: usize) -> String {
    if count == 1 {
        "1 gift in your cart expires soon".to_string()
    } else {
        format!("{count} gifts in your cart expire soon")
    }
}
