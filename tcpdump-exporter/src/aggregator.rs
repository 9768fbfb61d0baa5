use dashmap::DashMap;

use crate::flow_event::LabelTuple;

/// Packet and byte totals for one label tuple.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlowCounters {
    pub packets: u64,
    pub bytes: u64,
}

impl FlowCounters {
    fn add(&mut self, length: u64) {
        self.packets = self.packets.saturating_add(1);
        self.bytes = self.bytes.saturating_add(length);
    }
}

/// Cumulative counters keyed by label tuple, shared between the pump and the
/// metrics endpoint.
///
/// Both counters of a tuple are updated under the same shard lock, so a
/// reader never sees the packet count of one update with the byte count of
/// another. Entries are created on first use and never removed.
#[derive(Debug, Default)]
pub struct Aggregator {
    counters: DashMap<LabelTuple, FlowCounters>, // DashMap for concurrent access by label tuple
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Counts one packet of `length` bytes for `labels`.
    pub fn record(&self, labels: &LabelTuple, length: u64) {
        // Existing tuples are the common case and need no key clone.
        if let Some(mut counters) = self.counters.get_mut(labels) {
            counters.add(length);
            return;
        }
        self.counters
            .entry(labels.clone())
            .or_default()
            .add(length);
    }

    pub fn get(&self, labels: &LabelTuple) -> Option<FlowCounters> {
        self.counters.get(labels).map(|counters| *counters)
    }

    /// Copies out every tuple with its counters, sorted by tuple.
    ///
    /// Shards are read-locked one at a time, so writers to other shards are
    /// never held up.
    pub fn snapshot(&self) -> Vec<(LabelTuple, FlowCounters)> {
        let mut snapshot: Vec<_> = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        snapshot.sort_by(|(a, _), (b, _)| a.cmp(b));
        snapshot
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
