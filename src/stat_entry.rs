//! Per-call-site aggregate statistics

use crate::call_site::CallSiteKey;

/// Aggregate timing statistics for one call site
///
/// Entries are owned by the [`Registry`](crate::registry::Registry); callers
/// only ever see copies taken by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatEntry {
    /// Call site this entry aggregates
    pub key: CallSiteKey,
    /// Number of recorded events
    pub count: u64,
    /// Sum of recorded durations (saturating)
    pub total_ns: u64,
    /// Shortest recorded duration (`u64::MAX` until the first event)
    pub min_ns: u64,
    /// Longest recorded duration
    pub max_ns: u64,
}

impl StatEntry {
    /// Create an entry with no events recorded yet
    pub fn new(key: CallSiteKey) -> Self {
        Self {
            key,
            count: 0,
            total_ns: 0,
            min_ns: u64::MAX,
            max_ns: 0,
        }
    }

    /// Fold one event duration into the aggregate
    pub fn apply(&mut self, duration_ns: u64) {
        self.count += 1;
        self.total_ns = self.total_ns.saturating_add(duration_ns);
        self.min_ns = self.min_ns.min(duration_ns);
        self.max_ns = self.max_ns.max(duration_ns);
    }

    /// Mean duration, or `None` when no events have been recorded
    ///
    /// Always lies within `min_ns..=max_ns`. Once `total_ns` has saturated the
    /// quotient understates the true mean, so it is clamped into that range.
    pub fn average_ns(&self) -> Option<u64> {
        if self.count == 0 {
            return None;
        }

        let avg = self.total_ns / self.count;
        if self.is_saturated() {
            Some(avg.clamp(self.min_ns, self.max_ns))
        } else {
            Some(avg)
        }
    }

    /// True once `total_ns` has hit the saturation ceiling
    pub fn is_saturated(&self) -> bool {
        self.total_ns == u64::MAX
    }
}
