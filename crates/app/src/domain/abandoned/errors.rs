//! Abandoned-cart store errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbandonedCartsStoreError {
    #[error("no abandoned cart for this session")]
    NotFound,

    #[error("snapshot serialization failed")]
    Serialization(#[source] serde_json::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AbandonedCartsStoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

impl From<serde_json::Error> for AbandonedCartsStoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}
