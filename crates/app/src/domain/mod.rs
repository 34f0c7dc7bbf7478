//! Persistence-backed domains.

pub mod abandoned;
