//! Global hook registry: per-event callback tables with monotonic ids.
//!
//! Four independent tables, one per event class (set, get, miss, delete).
//! Registration hands back a [`HookId`] drawn from a counter owned by the
//! cache instance, so ids are only meaningful against the registry that
//! issued them. Firing iterates the table in unspecified order; every
//! registered callback runs exactly once per event.
//!
//! Callbacks execute synchronously while the cache lock is held. A callback
//! that re-enters the cache deadlocks; that is a documented caller
//! obligation, not something the registry guards against.

use std::time::Duration;

use rustc_hash::FxHashMap;

/// Identifier returned by hook registration, unique per cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    /// Returns the raw identifier value.
    pub fn value(self) -> u64 {
        self.0
    }
}

type SetHook<K, V> = Box<dyn FnMut(&K, &V, Duration) + Send>;
type GetHook<K, V> = Box<dyn FnMut(&K, &V) + Send>;
type MissHook<K> = Box<dyn FnMut(&K) + Send>;
type DeleteHook<K, V> = Box<dyn FnMut(&K, &V) + Send>;

pub(crate) struct HookRegistry<K, V> {
    next_id: u64,
    on_set: FxHashMap<u64, SetHook<K, V>>,
    on_get: FxHashMap<u64, GetHook<K, V>>,
    on_miss: FxHashMap<u64, MissHook<K>>,
    on_delete: FxHashMap<u64, DeleteHook<K, V>>,
}

impl<K, V> HookRegistry<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            on_set: FxHashMap::default(),
            on_get: FxHashMap::default(),
            on_miss: FxHashMap::default(),
            on_delete: FxHashMap::default(),
        }
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn add_on_set(&mut self, hook: SetHook<K, V>) -> HookId {
        let id = self.fresh_id();
        self.on_set.insert(id, hook);
        HookId(id)
    }

    pub(crate) fn remove_on_set(&mut self, id: HookId) -> bool {
        self.on_set.remove(&id.0).is_some()
    }

    pub(crate) fn fire_set(&mut self, key: &K, value: &V, ttl: Duration) {
        for hook in self.on_set.values_mut() {
            hook(key, value, ttl);
        }
    }

    pub(crate) fn add_on_get(&mut self, hook: GetHook<K, V>) -> HookId {
        let id = self.fresh_id();
        self.on_get.insert(id, hook);
        HookId(id)
    }

    pub(crate) fn remove_on_get(&mut self, id: HookId) -> bool {
        self.on_get.remove(&id.0).is_some()
    }

    pub(crate) fn fire_get(&mut self, key: &K, value: &V) {
        for hook in self.on_get.values_mut() {
            hook(key, value);
        }
    }

    pub(crate) fn add_on_miss(&mut self, hook: MissHook<K>) -> HookId {
        let id = self.fresh_id();
        self.on_miss.insert(id, hook);
        HookId(id)
    }

    pub(crate) fn remove_on_miss(&mut self, id: HookId) -> bool {
        self.on_miss.remove(&id.0).is_some()
    }

    pub(crate) fn fire_miss(&mut self, key: &K) {
        for hook in self.on_miss.values_mut() {
            hook(key);
        }
    }

    pub(crate) fn add_on_delete(&mut self, hook: DeleteHook<K, V>) -> HookId {
        let id = self.fresh_id();
        self.on_delete.insert(id, hook);
        HookId(id)
    }

    pub(crate) fn remove_on_delete(&mut self, id: HookId) -> bool {
        self.on_delete.remove(&id.0).is_some()
    }

    pub(crate) fn fire_delete(&mut self, key: &K, value: &V) {
        for hook in self.on_delete.values_mut() {
            hook(key, value);
        }
    }

    /// Drops every registered hook (cache shutdown).
    pub(crate) fn clear(&mut self) {
        self.on_set.clear();
        self.on_get.clear();
        self.on_miss.clear();
        self.on_delete.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn ids_are_monotonic_across_event_classes() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let a = registry.add_on_set(Box::new(|_, _, _| {}));
        let b = registry.add_on_get(Box::new(|_, _| {}));
        let c = registry.add_on_miss(Box::new(|_| {}));
        let d = registry.add_on_delete(Box::new(|_, _| {}));

        assert!(a.value() < b.value());
        assert!(b.value() < c.value());
        assert!(c.value() < d.value());
    }

    #[test]
    fn every_registered_hook_fires_once() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            registry.add_on_get(Box::new(move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        registry.fire_get(&"k", &1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn remove_reports_whether_id_existed() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let id = registry.add_on_miss(Box::new(|_| {}));

        assert!(registry.remove_on_miss(id));
        assert!(!registry.remove_on_miss(id));
    }

    #[test]
    fn removed_hook_no_longer_fires() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls2 = calls.clone();
        let id = registry.add_on_delete(Box::new(move |_, _| {
            calls2.fetch_add(1, Ordering::SeqCst);
        }));
        registry.remove_on_delete(id);

        registry.fire_delete(&"k", &1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let a = registry.add_on_set(Box::new(|_, _, _| {}));
        registry.remove_on_set(a);
        let b = registry.add_on_set(Box::new(|_, _, _| {}));

        assert!(b.value() > a.value());
    }

    #[test]
    fn clear_drops_all_tables() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let a = registry.add_on_set(Box::new(|_, _, _| {}));
        let b = registry.add_on_get(Box::new(|_, _| {}));
        registry.clear();

        assert!(!registry.remove_on_set(a));
        assert!(!registry.remove_on_get(b));
    }

    #[test]
    fn set_hook_receives_ttl() {
        let mut registry: HookRegistry<&str, i32> = HookRegistry::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen2 = seen.clone();
        registry.add_on_set(Box::new(move |_, _, ttl| {
            seen2.store(ttl.as_millis() as usize, Ordering::SeqCst);
        }));

        registry.fire_set(&"k", &1, Duration::from_millis(250));
        assert_eq!(seen.load(Ordering::SeqCst), 250);
    }
}
