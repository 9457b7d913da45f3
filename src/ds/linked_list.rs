//! Doubly linked list backed by a generational [`SlotArena`].
//!
//! Stores nodes in the arena and links them by `SlotId`, giving stable
//! handles and O(1) splice operations without raw pointer aliasing. The cache
//! uses list position to encode eviction risk: the front of the list is the
//! next to go, the back is the safest.
//!
//! ## Operations
//! - `push_front` / `push_back`: O(1)
//! - `pop_front` / `remove`: O(1)
//! - `move_to_front` / `move_to_back`: O(1)
//! - `move_before` / `move_after`: O(1), used by the frequency bubble re-sort
//! - `iter`: O(n), front to back
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
pub struct LinkedList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Returns the handle of the node immediately closer to the front.
    pub fn prev_id(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).and_then(|node| node.prev)
    }

    /// Returns the handle of the node immediately closer to the back.
    pub fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).and_then(|node| node.next)
    }

    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(node) = self.arena.get_mut(head) {
                node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        id
    }

    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        if let Some(tail) = self.tail {
            if let Some(node) = self.arena.get_mut(tail) {
                node.next = Some(id);
            }
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        id
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    /// Removes the node `id` and returns its value; the handle is dead after.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if Some(id) == self.head {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if Some(id) == self.tail {
            return true;
        }
        self.detach(id);
        self.attach_back(id);
        true
    }

    /// Moves `id` immediately before `mark`; no-op when already there.
    pub fn move_before(&mut self, id: SlotId, mark: SlotId) -> bool {
        if id == mark || !self.arena.contains(id) || !self.arena.contains(mark) {
            return false;
        }
        if self.next_id(id) == Some(mark) {
            return true;
        }
        self.detach(id);
        self.attach_before(id, mark);
        true
    }

    /// Moves `id` immediately after `mark`; no-op when already there.
    pub fn move_after(&mut self, id: SlotId, mark: SlotId) -> bool {
        if id == mark || !self.arena.contains(id) || !self.arena.contains(mark) {
            return false;
        }
        if self.prev_id(id) == Some(mark) {
            return true;
        }
        self.detach(id);
        self.attach_after(id, mark);
        true
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates values from front (highest eviction risk) to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Iterates `(SlotId, &T)` pairs from front to back.
    pub fn iter_entries(&self) -> EntryIter<'_, T> {
        EntryIter {
            list: self,
            current: self.head,
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
    }

    fn attach_back(&mut self, id: SlotId) {
        let old_tail = self.tail;
        if let Some(node) = self.arena.get_mut(id) {
            node.next = None;
            node.prev = old_tail;
        } else {
            return;
        }
        if let Some(old_tail) = old_tail {
            if let Some(tail_node) = self.arena.get_mut(old_tail) {
                tail_node.next = Some(id);
            }
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
    }

    // Caller guarantees `id` is detached and both handles are live.
    fn attach_before(&mut self, id: SlotId, mark: SlotId) {
        let mark_prev = self.arena.get(mark).and_then(|node| node.prev);
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = mark_prev;
            node.next = Some(mark);
        }
        if let Some(mark_node) = self.arena.get_mut(mark) {
            mark_node.prev = Some(id);
        }
        match mark_prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.arena.get_mut(prev_id) {
                    prev_node.next = Some(id);
                }
            },
            None => self.head = Some(id),
        }
    }

    fn attach_after(&mut self, id: SlotId, mark: SlotId) {
        let mark_next = self.arena.get(mark).and_then(|node| node.next);
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = Some(mark);
            node.next = mark_next;
        }
        if let Some(mark_node) = self.arena.get_mut(mark) {
            mark_node.next = Some(id);
        }
        match mark_next {
            Some(next_id) => {
                if let Some(next_node) = self.arena.get_mut(next_id) {
                    next_node.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;

        while let Some(id) = current {
            assert!(seen.insert(id));
            let node = self.arena.get(id).expect("linked node missing from arena");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len());
        }

        assert_eq!(count, self.len());
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

pub struct EntryIter<'a, T> {
    list: &'a LinkedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for EntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some((id, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot<T: Copy>(list: &LinkedList<T>) -> Vec<T> {
        list.iter().copied().collect()
    }

    #[test]
    fn push_and_pop_both_ends() {
        let mut list = LinkedList::new();
        let a = list.push_front("a");
        list.push_back("b");
        let c = list.push_back("c");

        assert_eq!(snapshot(&list), vec!["a", "b", "c"]);
        assert_eq!(list.front_id(), Some(a));
        assert_eq!(list.back_id(), Some(c));

        assert_eq!(list.pop_front(), Some("a"));
        assert_eq!(list.pop_front(), Some("b"));
        assert_eq!(list.pop_front(), Some("c"));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_middle_and_ends() {
        let mut list = LinkedList::new();
        let a = list.push_back("a");
        let b = list.push_back("b");
        let c = list.push_back("c");

        assert_eq!(list.remove(b), Some("b"));
        assert_eq!(snapshot(&list), vec!["a", "c"]);

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.remove(c), Some("c"));
        assert!(list.is_empty());
        assert_eq!(list.front_id(), None);
        assert_eq!(list.back_id(), None);
        list.debug_validate_invariants();
    }

    #[test]
    fn removed_handle_is_dead() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        list.remove(a);
        let b = list.push_back(2);

        assert_eq!(list.get(a), None);
        assert!(!list.move_to_front(a));
        assert!(!list.move_before(a, b));
        assert_eq!(list.remove(a), None);
        assert_eq!(list.get(b), Some(&2));
    }

    #[test]
    fn move_to_front_and_back() {
        let mut list = LinkedList::new();
        let a = list.push_back("a");
        list.push_back("b");
        let c = list.push_back("c");

        assert!(list.move_to_front(c));
        assert_eq!(snapshot(&list), vec!["c", "a", "b"]);

        assert!(list.move_to_back(c));
        assert_eq!(snapshot(&list), vec!["a", "b", "c"]);

        // Already at the target end.
        assert!(list.move_to_front(a));
        assert_eq!(snapshot(&list), vec!["a", "b", "c"]);
        list.debug_validate_invariants();
    }

    #[test]
    fn move_before_and_after_neighbors() {
        let mut list = LinkedList::new();
        let a = list.push_back("a");
        let b = list.push_back("b");
        let c = list.push_back("c");

        assert!(list.move_before(c, a));
        assert_eq!(snapshot(&list), vec!["c", "a", "b"]);

        assert!(list.move_after(c, b));
        assert_eq!(snapshot(&list), vec!["a", "b", "c"]);

        // Already adjacent in the requested direction.
        assert!(list.move_before(a, b));
        assert_eq!(snapshot(&list), vec!["a", "b", "c"]);
        assert!(list.move_after(b, a));
        assert_eq!(snapshot(&list), vec!["a", "b", "c"]);

        // Self-moves are rejected.
        assert!(!list.move_before(a, a));
        list.debug_validate_invariants();
    }

    #[test]
    fn neighbor_handles() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        let b = list.push_back(2);
        let c = list.push_back(3);

        assert_eq!(list.prev_id(a), None);
        assert_eq!(list.next_id(a), Some(b));
        assert_eq!(list.prev_id(c), Some(b));
        assert_eq!(list.next_id(c), None);
    }

    #[test]
    fn iter_entries_pairs_ids_with_values() {
        let mut list = LinkedList::new();
        let a = list.push_back("a");
        let b = list.push_back("b");

        let entries: Vec<_> = list.iter_entries().map(|(id, v)| (id, *v)).collect();
        assert_eq!(entries, vec![(a, "a"), (b, "b")]);
    }

    #[test]
    fn clear_resets_state() {
        let mut list = LinkedList::new();
        list.push_back(1);
        list.push_back(2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.pop_front(), None);
        list.debug_validate_invariants();
    }
}
