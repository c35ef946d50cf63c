//! Client for a Vitrine server.
//!
//! [`SiteClient`] speaks the public façade and the admin API. [`SiteStore`]
//! keeps a snapshot of everything the website renders and refreshes it after
//! every successful write.

pub mod client;
pub mod error;
pub mod store;

pub use client::SiteClient;
pub use error::{ClientError, UpstreamError};
pub use store::{Phase, SiteSnapshot, SiteStore};
