//! Abandoned carts

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::AbandonedCartsStoreError;
pub use service::*;
