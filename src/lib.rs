//! Vitrine: content backend for a marketing website.
//!
//! A Postgres content store, an authenticated admin API and a public read
//! façade, served by one axum router.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
