//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    activity::ActivityTracker,
    database,
    domain::abandoned::{AbandonedCartsStore, PgAbandonedCartsStore},
    notify::{Notifier, TracingNotifier},
    store::SharedCart,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Shared services wired at startup: the session cart, the activity tracker
/// (registered as a cart observer), the notification sink, and the
/// abandoned-cart store.
#[derive(Clone)]
pub struct AppContext {
    pub cart: SharedCart,
    pub activity: Arc<ActivityTracker>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn AbandonedCartsStore>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let cart = SharedCart::new();
        let activity = Arc::new(ActivityTracker::new());

        cart.register_observer(activity.clone());

        Ok(Self {
            cart,
            activity,
            notifier: Arc::new(TracingNotifier),
            store: Arc::new(PgAbandonedCartsStore::new(pool)),
        })
    }
}
