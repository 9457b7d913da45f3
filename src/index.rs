//! Ordered entry index: the eviction-risk list plus the key lookup map.
//!
//! ## Architecture
//!
//! ```text
//!   list (LinkedList<Entry<K, V>>)
//!
//!   front ─► [ "a" ] ◄──► [ "b" ] ◄──► [ "c" ] ◄── back
//!            highest                     lowest
//!            eviction risk               eviction risk
//!
//!   map (FxHashMap<K, SlotId>)
//!   ┌─────┬─────────┐
//!   │ "a" │ slot_0  │   Invariant: the map holds exactly the keys in the
//!   │ "b" │ slot_1  │   list, each pointing at the unique live slot whose
//!   │ "c" │ slot_2  │   entry carries that key (bijective).
//!   └─────┴─────────┘
//! ```
//!
//! List position is the sole source of truth for eviction order. Handles
//! stay valid while other entries are reordered and die the moment their
//! entry is removed (generational slots, see [`crate::ds::slot_arena`]).

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{LinkedList, SlotId};
use crate::entry::Entry;

pub(crate) struct OrderedIndex<K, V> {
    list: LinkedList<Entry<K, V>>,
    map: FxHashMap<K, SlotId>,
}

impl<K, V> OrderedIndex<K, V>
where
    K: Clone + Eq + Hash,
{
    pub(crate) fn new() -> Self {
        Self {
            list: LinkedList::new(),
            map: FxHashMap::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub(crate) fn slot_of(&self, key: &K) -> Option<SlotId> {
        self.map.get(key).copied()
    }

    /// Inserts a new entry at the front (highest eviction risk).
    pub(crate) fn insert_front(&mut self, entry: Entry<K, V>) -> SlotId {
        let key = entry.key.clone();
        let id = self.list.push_front(entry);
        self.map.insert(key, id);
        id
    }

    /// Inserts a new entry at the back (lowest eviction risk).
    pub(crate) fn insert_back(&mut self, entry: Entry<K, V>) -> SlotId {
        let key = entry.key.clone();
        let id = self.list.push_back(entry);
        self.map.insert(key, id);
        id
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.list.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.list.get_mut(id)
    }

    /// Removes the entry holding `key`, invalidating its handle.
    pub(crate) fn remove_key(&mut self, key: &K) -> Option<Entry<K, V>> {
        let id = self.map.remove(key)?;
        self.list.remove(id)
    }

    /// Removes the entry at the front of the list (highest risk).
    pub(crate) fn pop_front(&mut self) -> Option<Entry<K, V>> {
        let entry = self.list.pop_front()?;
        self.map.remove(&entry.key);
        Some(entry)
    }

    pub(crate) fn move_to_front(&mut self, id: SlotId) -> bool {
        self.list.move_to_front(id)
    }

    pub(crate) fn move_to_back(&mut self, id: SlotId) -> bool {
        self.list.move_to_back(id)
    }

    pub(crate) fn move_before(&mut self, id: SlotId, mark: SlotId) -> bool {
        self.list.move_before(id, mark)
    }

    pub(crate) fn move_after(&mut self, id: SlotId, mark: SlotId) -> bool {
        self.list.move_after(id, mark)
    }

    pub(crate) fn prev_id(&self, id: SlotId) -> Option<SlotId> {
        self.list.prev_id(id)
    }

    pub(crate) fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.list.next_id(id)
    }

    pub(crate) fn hit_count(&self, id: SlotId) -> Option<u64> {
        self.list.get(id).map(|entry| entry.hit_count)
    }

    /// Iterates entries from front (highest eviction risk) to back.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.list.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.list.clear();
        self.map.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.map.len(), self.list.len());
        for (key, &id) in &self.map {
            let entry = self.list.get(id).expect("mapped slot missing from list");
            assert!(&entry.key == key, "map points at a slot with another key");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryHooks;

    fn entry(key: &str, value: i32) -> Entry<&str, i32> {
        Entry::new(key, value, None, EntryHooks::new())
    }

    fn keys<'a>(index: &OrderedIndex<&'a str, i32>) -> Vec<&'a str> {
        index.iter().map(|e| e.key).collect()
    }

    #[test]
    fn insert_back_preserves_insertion_order() {
        let mut index = OrderedIndex::new();
        index.insert_back(entry("a", 1));
        index.insert_back(entry("b", 2));
        index.insert_back(entry("c", 3));

        assert_eq!(keys(&index), vec!["a", "b", "c"]);
        assert_eq!(index.len(), 3);
        index.debug_validate_invariants();
    }

    #[test]
    fn insert_front_puts_newest_at_highest_risk() {
        let mut index = OrderedIndex::new();
        index.insert_front(entry("a", 1));
        index.insert_front(entry("b", 2));

        assert_eq!(keys(&index), vec!["b", "a"]);
    }

    #[test]
    fn remove_key_drops_both_sides() {
        let mut index = OrderedIndex::new();
        index.insert_back(entry("a", 1));
        let b = index.insert_back(entry("b", 2));

        let removed = index.remove_key(&"b").expect("entry present");
        assert_eq!(removed.value, 2);
        assert_eq!(index.slot_of(&"b"), None);
        assert_eq!(index.get(b).map(|e| e.key), None);
        assert_eq!(index.len(), 1);
        index.debug_validate_invariants();
    }

    #[test]
    fn pop_front_removes_highest_risk_entry() {
        let mut index = OrderedIndex::new();
        index.insert_back(entry("a", 1));
        index.insert_back(entry("b", 2));

        let popped = index.pop_front().expect("non-empty");
        assert_eq!(popped.key, "a");
        assert_eq!(index.slot_of(&"a"), None);
        assert_eq!(keys(&index), vec!["b"]);
    }

    #[test]
    fn reordering_keeps_handles_valid() {
        let mut index = OrderedIndex::new();
        let a = index.insert_back(entry("a", 1));
        let b = index.insert_back(entry("b", 2));
        index.insert_back(entry("c", 3));

        index.move_to_back(a);
        index.move_to_front(b);
        assert_eq!(keys(&index), vec!["b", "c", "a"]);

        // Handles survived the moves.
        assert_eq!(index.get(a).map(|e| e.value), Some(1));
        assert_eq!(index.slot_of(&"b"), Some(b));
        index.debug_validate_invariants();
    }

    #[test]
    fn clear_empties_list_and_map() {
        let mut index = OrderedIndex::new();
        index.insert_back(entry("a", 1));
        index.insert_back(entry("b", 2));
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.slot_of(&"a"), None);
        index.debug_validate_invariants();
    }
}
