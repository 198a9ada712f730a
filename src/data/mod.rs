//! Data loading
//!
//! Handles:
//! - Per-DTE chain snapshot files (JSON)
//! - Concatenating snapshots into one contract table

pub mod snapshot;

pub use snapshot::*;
