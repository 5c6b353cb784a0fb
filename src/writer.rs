//! # Writer (C5)
//!
//! The mutating half of the public API: opening/creating a file, writing
//! global and per-frame parameters, encoding and storing scans, and
//! triggering the offline bin-centric build.

mod config;
mod error;
mod types;
mod writer_impl;

#[cfg(test)]
mod tests;

pub use config::WriterConfig;
pub use error::WriterError;
pub use types::NewFrame;
pub use writer_impl::Writer;
