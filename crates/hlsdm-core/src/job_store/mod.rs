//! In-process job store.
//!
//! Holds one record per download job for the lifetime of the process
//! (no eviction, no persistence). Each record sits behind its own mutex so
//! `update` on one job never waits on another; the index itself is only
//! write-locked while inserting.

pub mod store;
pub mod types;

pub use store::JobStore;
pub use types::*;
