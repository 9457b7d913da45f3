//! Replacement strategies: where new entries land and how positions change
//! on access.
//!
//! The ordered index encodes eviction risk by list position (front = next to
//! evict). Each strategy is a stateless rule set over that order:
//!
//! | Strategy     | New key     | Replace existing | Access (get)            |
//! |--------------|-------------|------------------|-------------------------|
//! | `None`       | back        | keep position    | keep position           |
//! | `Fifo`       | back        | keep position    | keep position           |
//! | `Lifo`       | front       | keep position    | keep position           |
//! | `Lru`        | back        | move to back     | move to back            |
//! | `Mru`        | front       | move to front    | move to front           |
//! | `Lfu`        | back        | keep position    | bump hits, bubble sort  |
//! | `Mfu`        | back        | keep position    | bump hits, bubble sort  |
//!
//! For `Lfu` the list is kept ascending by hit count toward the front (the
//! coldest entry is the riskiest); for `Mfu` it is descending (the hottest
//! entry is the riskiest). The re-sort after a hit is a local bubble step:
//! it assumes the rest of the list already satisfies the order and walks the
//! touched entry outward, one neighbor at a time, until both sides agree.

use std::hash::Hash;

use crate::ds::SlotId;
use crate::index::OrderedIndex;

/// Eviction-order policy, fixed at cache construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReplacementStrategy {
    /// No reordering and no threshold eviction; entries keep insertion order.
    #[default]
    None,
    /// Least Recently Used: every access moves the entry to the safe end.
    Lru,
    /// Most Recently Used: every access moves the entry to the risky end.
    Mru,
    /// First In First Out: order fixed at insertion.
    Fifo,
    /// Last In First Out: newest entries are evicted first.
    Lifo,
    /// Least Frequently Used: ordered by hit count, coldest evicted first.
    Lfu,
    /// Most Frequently Used: ordered by hit count, hottest evicted first.
    Mfu,
}

impl ReplacementStrategy {
    /// Whether threshold eviction applies under this strategy.
    pub(crate) fn evicts(self) -> bool {
        self != ReplacementStrategy::None
    }

    /// True when a brand-new key lands at the front (riskiest end).
    pub(crate) fn inserts_at_front(self) -> bool {
        matches!(self, ReplacementStrategy::Lifo | ReplacementStrategy::Mru)
    }

    /// Positional reaction to replacing an existing key's value.
    pub(crate) fn on_replace<K, V>(self, index: &mut OrderedIndex<K, V>, id: SlotId)
    where
        K: Clone + Eq + Hash,
    {
        match self {
            ReplacementStrategy::Lru => {
                index.move_to_back(id);
            },
            ReplacementStrategy::Mru => {
                index.move_to_front(id);
            },
            _ => {},
        }
    }

    /// Positional reaction to a successful get.
    pub(crate) fn on_access<K, V>(self, index: &mut OrderedIndex<K, V>, id: SlotId)
    where
        K: Clone + Eq + Hash,
    {
        match self {
            ReplacementStrategy::Lru => {
                index.move_to_back(id);
            },
            ReplacementStrategy::Mru => {
                index.move_to_front(id);
            },
            ReplacementStrategy::Lfu | ReplacementStrategy::Mfu => {
                if let Some(entry) = index.get_mut(id) {
                    entry.hit_count += 1;
                }
                self.resort_by_hits(index, id);
            },
            _ => {},
        }
    }

    /// Local bubble step restoring the frequency order around `id`.
    ///
    /// Iterative on purpose: a recursive formulation can nest as deep as the
    /// distance the entry travels under pathological access patterns.
    fn resort_by_hits<K, V>(self, index: &mut OrderedIndex<K, V>, id: SlotId)
    where
        K: Clone + Eq + Hash,
    {
        let Some(hits) = index.hit_count(id) else {
            return;
        };

        // For LFU the front holds the lowest hit counts; a predecessor with
        // more hits is out of order. MFU is the mirror image.
        let toward_front = |neighbor: u64| match self {
            ReplacementStrategy::Lfu => neighbor > hits,
            ReplacementStrategy::Mfu => neighbor < hits,
            _ => false,
        };
        let toward_back = |neighbor: u64| match self {
            ReplacementStrategy::Lfu => neighbor < hits,
            ReplacementStrategy::Mfu => neighbor > hits,
            _ => false,
        };

        while let Some(prev) = index.prev_id(id) {
            match index.hit_count(prev) {
                Some(neighbor) if toward_front(neighbor) => {
                    index.move_before(id, prev);
                },
                _ => break,
            }
        }

        while let Some(next) = index.next_id(id) {
            match index.hit_count(next) {
                Some(neighbor) if toward_back(neighbor) => {
                    index.move_after(id, next);
                },
                _ => break,
            }
        }
    }
}
