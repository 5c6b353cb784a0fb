//! Bounded LRU cache of decoded scans (§5 state: "a bounded LRU of
//! spectrum caches (capacity 10)").
//!
//! Decoding a scan means one LZF decompression and one RLE walk; for
//! queries that revisit the same frame/scan repeatedly (XIC extraction
//! across a drift-time profile, for instance) caching the decoded
//! `(bin, intensity)` pairs avoids redoing that work.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::codec::DecodedScan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanKey {
    pub frame_num: i64,
    pub scan_num: u32,
}

pub struct SpectrumCache {
    capacity: usize,
    entries: HashMap<ScanKey, DecodedScan>,
    order: VecDeque<ScanKey>,
}

impl SpectrumCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: ScanKey) -> Option<&DecodedScan> {
        if self.entries.contains_key(&key) {
            self.touch(key);
            self.entries.get(&key)
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: ScanKey, scan: DecodedScan) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, scan);
        self.touch(key);
    }

    fn touch(&mut self, key: ScanKey) {
        self.order.retain(|k| *k != key);
        self.order.push_back(key);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(non_zero_count: i32) -> DecodedScan {
        DecodedScan {
            pairs: vec![],
            non_zero_count,
            tic: 0,
            bpi: 0,
            bpi_bin: 0,
        }
    }

    #[test]
    fn evicts_least_recently_used_when_over_capacity() {
        let mut cache = SpectrumCache::new(2);
        cache.insert(ScanKey { frame_num: 1, scan_num: 0 }, scan(1));
        cache.insert(ScanKey { frame_num: 1, scan_num: 1 }, scan(2));
        assert!(cache.get(ScanKey { frame_num: 1, scan_num: 0 }).is_some());

        cache.insert(ScanKey { frame_num: 1, scan_num: 2 }, scan(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(ScanKey { frame_num: 1, scan_num: 1 }).is_none());
        assert!(cache.get(ScanKey { frame_num: 1, scan_num: 0 }).is_some());
        assert!(cache.get(ScanKey { frame_num: 1, scan_num: 2 }).is_some());
    }
}
