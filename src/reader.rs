//! # Reader & query engine (C6)
//!
//! The read-only half of the public API: spectrum/TIC/BPI aggregation,
//! XIC and 3D profile extraction, and drift-time correction, all backed by
//! a lazily populated per-frame parameter cache and a bounded LRU of
//! decoded scans.

mod cache;
mod config;
mod error;
mod query;
mod reader_impl;

#[cfg(test)]
mod tests;

pub use config::ReaderConfig;
pub use error::ReaderError;
pub use query::QueryPlan;
pub use reader_impl::{Reader, XicPoint};
