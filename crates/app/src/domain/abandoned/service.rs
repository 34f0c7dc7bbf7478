//! Abandoned carts store.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::abandoned::{
    errors::AbandonedCartsStoreError,
    models::{AbandonedCartRecord, AbandonedCartSnapshot},
    repository::PgAbandonedCartsRepository,
};

/// External store for abandoned-cart records, keyed by session UUID. The
/// upsert is idempotent, so trackers may re-issue it every check interval.
#[automock]
#[async_trait]
pub trait AbandonedCartsStore: Send + Sync {
    /// Creates or refreshes the session's abandoned-cart record.
    async fn upsert_abandoned_cart(
        &self,
        snapshot: AbandonedCartSnapshot,
    ) -> Result<(), AbandonedCartsStoreError>;

    /// Flags the session's record as recovered, e.g. after checkout.
    async fn mark_cart_as_recovered(&self, session: Uuid) -> Result<(), AbandonedCartsStoreError>;

    /// Retrieves the session's record.
    async fn get_abandoned_cart(
        &self,
        session: Uuid,
    ) -> Result<AbandonedCartRecord, AbandonedCartsStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgAbandonedCartsStore {
    pool: PgPool,
    repository: PgAbandonedCartsRepository,
}

impl PgAbandonedCartsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repository: PgAbandonedCartsRepository::new(),
        }
    }
}

#[async_trait]
impl AbandonedCartsStore for PgAbandonedCartsStore {
    async fn upsert_abandoned_cart(
        &self,
        snapshot: AbandonedCartSnapshot,
    ) -> Result<(), AbandonedCartsStoreError> {
        let items = serde_json::to_value(&snapshot.items)?;

        self.repository.upsert(&self.pool, &snapshot, items).await?;

        Ok(())
    }

    async fn mark_cart_as_recovered(&self, session: Uuid) -> Result<(), AbandonedCartsStoreError> {
        let recovered_at = SqlxTimestamp::from(Timestamp::now());

        let rows_affected = self
            .repository
            .mark_recovered(&self.pool, session, recovered_at)
            .await?;

        if rows_affected == 0 {
            return Err(AbandonedCartsStoreError::NotFound);
        }

        Ok(())
    }

    async fn get_abandoned_cart(
        &self,
        session: Uuid,
    ) -> Result<AbandonedCartRecord, AbandonedCartsStoreError> {
        let record = self.repository.get(&self.pool, session).await?;

        Ok(record)
    }
}
