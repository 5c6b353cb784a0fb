//! # Parameter model (C3)
//!
//! Global and per-frame metadata are both stored as `(key, typed value)`
//! pairs rather than fixed columns, so that new keys can be added without a
//! schema migration. This module defines the two key enums
//! ([`GlobalParamKey`], [`FrameParamKey`]), the tagged-union
//! [`ParamValue`] with its string coercion rules, and the legacy column
//! name alias tables (§4.3).

mod error;
mod frame;
mod global;
mod legacy;
mod value;

#[cfg(test)]
mod tests;

pub use error::ParamError;
pub use frame::{fragmentation_profile_from_storage, fragmentation_profile_to_storage, FrameParamKey};
pub use global::GlobalParamKey;
pub use value::{coerce, ParamDataType, ParamValue};

use std::collections::HashSet;
use std::sync::Mutex;

/// Tracks which unknown parameter IDs have already triggered a warning, so
/// that a file with many rows sharing one unrecognized ID logs exactly
/// once per ID (§4.3, §8 scenario 6).
#[derive(Default)]
pub struct UnknownKeyWarnings {
    seen: Mutex<HashSet<i32>>,
}

impl UnknownKeyWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn about `id` the first time it is seen; subsequent calls with the
    /// same `id` are silent. Returns `true` if this call actually warned.
    pub fn warn_once(&self, id: i32, context: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.insert(id) {
            log::warn!("unknown {context} parameter id {id}; skipping");
            true
        } else {
            false
        }
    }
}
