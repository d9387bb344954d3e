//! Bounded call-site statistics registry
//!
//! A fixed array of buckets, each holding a chain of [`StatEntry`] values.
//! The bucket for a key is chosen by FNV-1a over the key bytes.
//!
//! Capacity is a global *event* budget rather than a key limit: every
//! successful [`Registry::record`] spends one unit, and once the budget is
//! gone all further events are dropped until [`Registry::clear`] refills it.
//! Since each event creates at most one entry, the budget also bounds the
//! number of distinct keys and therefore memory.
//!
//! The registry itself is not synchronized. [`PerfTracer`](crate::tracer::PerfTracer)
//! wraps it in a single lock.

use crate::call_site::CallSiteKey;
use crate::stat_entry::StatEntry;
use std::hash::Hasher;

/// Default event budget (total events across all call sites)
pub const DEFAULT_MAX_EVENTS: u64 = 1000;

/// Default bucket bits (256 buckets)
pub const DEFAULT_BUCKET_BITS: u32 = 8;

/// Largest supported bucket table (65536 buckets)
pub const MAX_BUCKET_BITS: u32 = 16;

/// Capacity-bounded hash table of call-site statistics
#[derive(Debug)]
pub struct Registry {
    buckets: Vec<Vec<StatEntry>>,
    mask: u64,
    max_events: u64,
    events_remaining: u64,
    entries: usize,
}

/// Bucket hash for a key
///
/// FNV-1a: single pass, no per-process seed, so bucket placement is stable
/// across runs.
fn bucket_hash(key: &CallSiteKey) -> u64 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(key.as_bytes());
    hasher.finish()
}

impl Registry {
    /// Create a registry with `2^bucket_bits` buckets and an event budget
    ///
    /// `bucket_bits` is clamped to `1..=MAX_BUCKET_BITS`.
    pub fn new(max_events: u64, bucket_bits: u32) -> Self {
        let bucket_count = 1usize << bucket_bits.clamp(1, MAX_BUCKET_BITS);
        Self {
            buckets: vec![Vec::new(); bucket_count],
            mask: (bucket_count - 1) as u64,
            max_events,
            events_remaining: max_events,
            entries: 0,
        }
    }

    fn bucket_index(&self, key: &CallSiteKey) -> usize {
        (bucket_hash(key) & self.mask) as usize
    }

    /// Find the entry for `key`, creating it if the budget allows
    ///
    /// Returns `None` without allocating when the key is new and
    /// `events_remaining` is zero.
    pub fn lookup_or_create(&mut self, key: CallSiteKey) -> Option<&mut StatEntry> {
        let index = self.bucket_index(&key);
        let chain = &mut self.buckets[index];

        match chain.iter().position(|e| e.key == key) {
            Some(pos) => Some(&mut chain[pos]),
            None => {
                if self.events_remaining == 0 {
                    return None;
                }
                chain.push(StatEntry::new(key));
                self.entries += 1;
                chain.last_mut()
            }
        }
    }

    /// Record one event of `duration_ns` for `key`
    ///
    /// Returns false (leaving every entry untouched) when the event budget is
    /// already spent.
    pub fn record(&mut self, key: CallSiteKey, duration_ns: u64) -> bool {
        if self.events_remaining == 0 {
            return false;
        }

        match self.lookup_or_create(key) {
            Some(entry) => {
                entry.apply(duration_ns);
                self.events_remaining -= 1;
                true
            }
            None => false,
        }
    }

    /// Drop every entry and refill the event budget
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.entries = 0;
        self.events_remaining = self.max_events;
    }

    /// Copies of all entries, sorted by key
    pub fn snapshot(&self) -> Vec<StatEntry> {
        let mut entries: Vec<StatEntry> = self.buckets.iter().flatten().copied().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Look up an entry without creating it
    pub fn get(&self, key: &CallSiteKey) -> Option<&StatEntry> {
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|e| e.key == *key)
    }

    /// Events that can still be recorded before the registry goes silent
    pub fn events_remaining(&self) -> u64 {
        self.events_remaining
    }

    /// Events recorded since the last clear
    pub fn events_recorded(&self) -> u64 {
        self.max_events - self.events_remaining
    }

    /// Configured event budget
    pub fn max_events(&self) -> u64 {
        self.max_events
    }

    /// Number of distinct call sites
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Length of the longest collision chain
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EVENTS, DEFAULT_BUCKET_BITS)
    }
}
