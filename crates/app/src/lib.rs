//! Aqua Rêve cart runtime.
//!
//! Wires the pure cart engine to background tasks: the gift expiry monitor,
//! the abandoned-cart tracker, the notification channel, and the Postgres
//! abandoned-cart store.

pub mod activity;
pub mod checkout;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod notify;
pub mod store;
pub mod tasks;
