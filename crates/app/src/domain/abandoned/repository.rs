//! Abandoned Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::abandoned::models::{AbandonedCartRecord, AbandonedCartSnapshot, SnapshotItem};

const UPSERT_ABANDONED_CART_SQL: &str = include_str!("sql/upsert_abandoned_cart.sql");
const MARK_CART_RECOVERED_SQL: &str = include_str!("sql/mark_cart_recovered.sql");
const GET_ABANDONED_CART_SQL: &str = include_str!("sql/get_abandoned_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAbandonedCartsRepository;

impl PgAbandonedCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn upsert(
        &self,
        pool: &PgPool,
        snapshot: &AbandonedCartSnapshot,
        items: serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_ABANDONED_CART_SQL)
            .bind(snapshot.session)
            .bind(items)
            .bind(snapshot.total)
            .bind(SqlxTimestamp::from(snapshot.captured_at))
            .execute(pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn mark_recovered(
        &self,
        pool: &PgPool,
        session: Uuid,
        recovered_at: SqlxTimestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_CART_RECOVERED_SQL)
            .bind(session)
            .bind(recovered_at)
            .execute(pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn get(
        &self,
        pool: &PgPool,
        session: Uuid,
    ) -> Result<AbandonedCartRecord, sqlx::Error> {
        query_as::<Postgres, AbandonedCartRecord>(GET_ABANDONED_CART_SQL)
            .bind(session)
            .fetch_one(pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AbandonedCartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let items_json: serde_json::Value = row.try_get("items")?;

        let items: Vec<SnapshotItem> =
            serde_json::from_value(items_json).map_err(|e| sqlx::Error::ColumnDecode {
                index: "items".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            session: row.try_get("session_uuid")?,
            items,
            total: row.try_get::<Decimal, _>("total")?,
            captured_at: row.try_get::<SqlxTimestamp, _>("captured_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            recovered: row.try_get("recovered")?,
        })
    }
}
