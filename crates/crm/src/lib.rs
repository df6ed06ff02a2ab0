//! The context-aggregation pipeline: fetch CRM collections, join them
//! into enriched leads, and assemble the bounded per-request snapshot.

pub mod aggregate;
pub mod client;
pub mod enrich;
pub mod stages;

pub use aggregate::aggregate;
pub use client::{CrmFetch, RestCrmClient};

#[cfg(test)]
pub(crate) mod testing;
