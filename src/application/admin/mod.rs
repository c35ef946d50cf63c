//! Application services for the administrative surface.
//!
//! Every mutating call takes the acting admin's label for the logs and bumps
//! `vitrine_admin_mutations_total{family, action}` once the write committed.

pub mod banners;
pub mod content;
pub mod dashboard;
pub mod error;
pub mod help;
pub mod segments;
pub mod solution_pages;
pub mod solutions;
pub mod stats;

use metrics::counter;
use tracing::info;

pub use error::AdminError;

pub const METRIC_ADMIN_MUTATIONS: &str = "vitrine_admin_mutations_total";

pub(crate) fn record_mutation(actor: &str, family: &'static str, action: &'static str, key: &str) {
    counter!(METRIC_ADMIN_MUTATIONS, "family" => family, "action" => action).increment(1);
    info!(
        target = "vitrine::admin",
        actor,
        family,
        action,
        key,
        "admin mutation applied"
    );
}
