//! Shared cart handle with explicit change notification.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aquareve::{Cart, CartChange, CartItem, ItemId, PromoCode};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

/// Observer for cart changes, registered at wiring time by the application
/// root. Called after the cart lock has been released.
pub trait CartObserver: Send + Sync {
    /// Invoked once per mutating operation that actually changed the cart.
    fn on_cart_changed(&self, change: CartChange);
}

/// A cloneable handle to the single cart shared between the storefront flows
/// and the background tasks.
#[derive(Clone, Default)]
pub struct SharedCart {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    cart: Mutex<Cart>,
    observers: Mutex<Vec<Arc<dyn CartObserver>>>,
}

impl SharedCart {
    /// Creates a handle around an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle around an existing cart, e.g. one rehydrated from
    /// persisted session state.
    pub fn from_cart(cart: Cart) -> Self {
        Self {
            inner: Arc::new(Inner {
                cart: Mutex::new(cart),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers an observer for subsequent cart changes.
    pub fn register_observer(&self, observer: Arc<dyn CartObserver>) {
        lock(&self.inner.observers).push(observer);
    }

    /// See [`Cart::add_item`].
    pub fn add_item(&self, item: CartItem) -> Option<CartChange> {
        self.mutate(|cart| cart.add_item(item))
    }

    /// See [`Cart::adjust_quantity`].
    pub fn adjust_quantity(&self, id: &ItemId, delta: i64) -> Option<CartChange> {
        self.mutate(|cart| cart.adjust_quantity(id, delta))
    }

    /// See [`Cart::remove_item`].
    pub fn remove_item(&self, id: &ItemId) -> Option<CartChange> {
        self.mutate(|cart| cart.remove_item(id))
    }

    /// See [`Cart::clear`].
    pub fn clear(&self) -> Option<CartChange> {
        self.mutate(Cart::clear)
    }

    /// See [`Cart::apply_promo`].
    pub fn apply_promo(&self, promo: PromoCode) -> Option<CartChange> {
        self.mutate(|cart| cart.apply_promo(promo))
    }

    /// See [`Cart::remove_promo`].
    pub fn remove_promo(&self) -> Option<CartChange> {
        self.mutate(Cart::remove_promo)
    }

    /// Removes expired wheel gifts and returns them. Observers are notified
    /// when the sweep removed anything.
    pub fn sweep_expired(&self, now: Timestamp) -> Vec<CartItem> {
        let removed = lock(&self.inner.cart).sweep_expired(now);

        if !removed.is_empty() {
            self.notify(CartChange::Items);
        }

        removed
    }

    /// See [`Cart::expiring_soon`].
    pub fn expiring_soon(&self, now: Timestamp, window: SignedDuration) -> usize {
        lock(&self.inner.cart).expiring_soon(now, window)
    }

    /// See [`Cart::total`].
    pub fn total(&self) -> Decimal {
        lock(&self.inner.cart).total()
    }

    /// Runs a closure against the cart under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&lock(&self.inner.cart))
    }

    fn mutate(&self, f: impl FnOnce(&mut Cart) -> Option<CartChange>) -> Option<CartChange> {
        let change = f(&mut lock(&self.inner.cart));

        if let Some(change) = change {
            self.notify(change);
        }

        change
    }

    fn notify(&self, change: CartChange) {
        let observers: Vec<Arc<dyn CartObserver>> = lock(&self.inner.observers).clone();

        for observer in observers {
            observer.on_cart_changed(change);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Default)]
    struct CountingObserver {
        item_changes: AtomicUsize,
        promo_changes: AtomicUsize,
    }

    impl CartObserver for CountingObserver {
        fn on_cart_changed(&self, change: CartChange) {
            if change.touches_items() {
                self.item_changes.fetch_add(1, Ordering::SeqCst);
            } else {
                self.promo_changes.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn observers_see_item_changes_but_not_no_ops() {
        let cart = SharedCart::new();
        let observer = Arc::new(CountingObserver::default());
        cart.register_observer(observer.clone());

        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));
        cart.remove_item(&ItemId::from("heater"));
        cart.remove_item(&ItemId::from("heater"));
        cart.clear();

        assert_eq!(observer.item_changes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn promo_changes_are_reported_separately() {
        let cart = SharedCart::new();
        let observer = Arc::new(CountingObserver::default());
        cart.register_observer(observer.clone());

        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));

        let promo = PromoCode::percent_off("REVE10", dec!(10)).expect("valid promo");
        cart.apply_promo(promo);
        cart.remove_promo();
        cart.remove_promo();

        assert_eq!(observer.promo_changes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn rehydrates_a_persisted_cart() {
        let mut cart = Cart::new();
        cart.add_item(CartItem::normal("heater", dec!(24.90), 1));

        let json = serde_json::to_string(&cart).expect("cart serializes");
        let restored: Cart = serde_json::from_str(&json).expect("cart deserializes");

        let shared = SharedCart::from_cart(restored);

        assert_eq!(shared.total(), dec!(24.90));
        assert_eq!(shared.read(Cart::len), 1);
    }

    #[test]
    fn handles_share_the_same_cart() {
        let cart = SharedCart::new();
        let other = cart.clone();

        cart.add_item(CartItem::normal("gravel", dec!(5.00), 2));

        assert_eq!(other.total(), dec!(10.00));
    }
}
