//! Database connection management

use sqlx::{PgPool, query};

const ENSURE_SCHEMA_SQL: &str = include_str!("sql/ensure_schema.sql");

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Create the abandoned-carts table when it does not exist yet.
///
/// # Errors
///
/// Returns an error when the DDL statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    query(ENSURE_SCHEMA_SQL).execute(pool).await?;

    Ok(())
}
