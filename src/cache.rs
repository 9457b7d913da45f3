//! Cache facade: configuration, the public operation set, threshold
//! eviction, and the close lifecycle.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────┐
//!   │ Cache<K, V>                                                │
//!   │                                                            │
//!   │   Arc<Mutex<CacheState>> ──────────┐                       │
//!   │     ├─ OrderedIndex  (risk list +  │  shared with the      │
//!   │     │                 key map)     │  sweeper thread       │
//!   │     ├─ HookRegistry  (4 tables)    │                       │
//!   │     └─ closed flag                 ▼                       │
//!   │   Shutdown token ───────────► sweeper::spawn(...)          │
//!   │   JoinHandle      ◄─────────── joined by close()           │
//!   └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every public operation is one critical section on the mutex; the sweeper
//! takes the same mutex once per poll interval. Hooks run inside the
//! critical section and must not re-enter the cache (single non-reentrant
//! lock).
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use hookcache::{Cache, Config, ReplacementStrategy};
//!
//! let mut cache: Cache<String, String> = Config {
//!     strategy: ReplacementStrategy::Lru,
//!     max_record_threshold: 100,
//!     eviction_batch_size: 10,
//!     ..Config::default()
//! }
//! .build();
//!
//! cache.set("user:1".to_string(), "ada".to_string(), Duration::ZERO);
//! assert_eq!(cache.get(&"user:1".to_string()), Some("ada".to_string()));
//! assert_eq!(cache.count(), 1);
//!
//! cache.close();
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::entry::{Entry, EntryHooks};
use crate::error::ConfigError;
use crate::hooks::{HookId, HookRegistry};
use crate::index::OrderedIndex;
use crate::policy::ReplacementStrategy;
use crate::sweeper::{self, Shutdown};

/// Poll interval applied when the configured one is zero.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cache configuration, immutable after construction.
///
/// | Field                  | Effect                                             |
/// |------------------------|----------------------------------------------------|
/// | `strategy`             | eviction-order policy (default `None`)             |
/// | `max_record_threshold` | entry count that triggers eviction; 0 disables     |
/// | `eviction_batch_size`  | entries removed per threshold breach               |
/// | `poll_interval`        | sweeper wake period; zero defaults to 1 second     |
///
/// Threshold eviction runs only when the strategy is not
/// [`ReplacementStrategy::None`] and both `max_record_threshold` and
/// `eviction_batch_size` are positive. Batch-evicted entries do not fire
/// delete hooks; see [`Cache::flush`] for the same rule on bulk removal.
#[derive(Debug, Clone)]
pub struct Config {
    pub strategy: ReplacementStrategy,
    pub max_record_threshold: usize,
    pub eviction_batch_size: usize,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: ReplacementStrategy::None,
            max_record_threshold: 0,
            eviction_batch_size: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Config {
    /// Builds the cache and starts its sweeper thread.
    ///
    /// A zero `poll_interval` silently becomes [`DEFAULT_POLL_INTERVAL`]; an
    /// incoherent eviction setup (threshold without batch size) silently
    /// never evicts. Use [`try_build`](Self::try_build) to surface both.
    pub fn build<K, V>(self) -> Cache<K, V>
    where
        K: Clone + Eq + Hash + Send + 'static,
        V: Clone + Send + 'static,
    {
        Cache::with_config(self)
    }

    /// Validating variant of [`build`](Self::build).
    ///
    /// # Example
    ///
    /// ```
    /// use hookcache::{Cache, Config, ReplacementStrategy};
    ///
    /// let bad = Config {
    ///     strategy: ReplacementStrategy::Fifo,
    ///     max_record_threshold: 100,
    ///     eviction_batch_size: 0,
    ///     ..Config::default()
    /// }
    /// .try_build::<u64, u64>();
    /// assert!(bad.is_err());
    /// ```
    pub fn try_build<K, V>(self) -> Result<Cache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash + Send + 'static,
        V: Clone + Send + 'static,
    {
        if self.strategy.evicts() && self.max_record_threshold > 0 && self.eviction_batch_size == 0
        {
            return Err(ConfigError::new(
                "eviction_batch_size must be > 0 when max_record_threshold is set",
            ));
        }
        if !self.strategy.evicts() && self.max_record_threshold > 0 {
            return Err(ConfigError::new(
                "max_record_threshold has no effect with ReplacementStrategy::None",
            ));
        }
        Ok(Cache::with_config(self))
    }
}

pub(crate) struct CacheState<K, V> {
    pub(crate) index: OrderedIndex<K, V>,
    pub(crate) hooks: HookRegistry<K, V>,
    strategy: ReplacementStrategy,
    max_record_threshold: usize,
    eviction_batch_size: usize,
    closed: bool,
}

impl<K, V> CacheState<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Removes up to one batch of entries from the high-risk end.
    ///
    /// Delete hooks are deliberately not fired here: batch eviction is a
    /// capacity mechanism on the insert path, not an observable delete.
    fn evict_batch(&mut self) {
        for _ in 0..self.eviction_batch_size {
            if self.index.pop_front().is_none() {
                break;
            }
        }
    }

    /// Removes `key` and fires the global delete hooks plus the entry's own.
    fn remove_and_fire(&mut self, key: &K) -> bool {
        match self.index.remove_key(key) {
            Some(mut entry) => {
                self.hooks.fire_delete(&entry.key, &entry.value);
                if let Some(hook) = entry.hooks.on_delete.as_mut() {
                    hook();
                }
                true
            },
            None => false,
        }
    }

    /// Full expiry scan; called by the sweeper once per poll interval.
    pub(crate) fn sweep_expired(&mut self, now: Instant) {
        let expired: Vec<K> = self
            .index
            .iter()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.key.clone())
            .collect();
        for key in &expired {
            self.remove_and_fire(key);
        }
    }
}

/// In-process key-value cache with pluggable replacement policies, optional
/// per-entry TTL, and synchronous lifecycle hooks.
///
/// A `Cache` is a single exclusively-owned resource: construction starts the
/// sweeper thread, [`close`](Cache::close) (or `Drop`) stops it. Operations
/// take `&self` and are safe to call from multiple threads; all of them
/// serialize on one internal lock.
///
/// After `close`, `set` is a no-op and `get` misses (state was cleared);
/// this mirrors the degraded-but-defined post-shutdown contract rather than
/// erroring.
pub struct Cache<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    state: Arc<Mutex<CacheState<K, V>>>,
    shutdown: Shutdown,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    fn with_config(config: Config) -> Self {
        let poll_interval = if config.poll_interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            config.poll_interval
        };

        let state = Arc::new(Mutex::new(CacheState {
            index: OrderedIndex::new(),
            hooks: HookRegistry::new(),
            strategy: config.strategy,
            max_record_threshold: config.max_record_threshold,
            eviction_batch_size: config.eviction_batch_size,
            closed: false,
        }));

        let shutdown = Shutdown::new();
        let sweeper = sweeper::spawn(Arc::clone(&state), poll_interval, shutdown.clone());

        Self {
            state,
            shutdown,
            sweeper: Some(sweeper),
        }
    }

    /// Inserts or replaces `key` with `value`. A zero `ttl` never expires.
    ///
    /// Fires the global set hooks, runs the threshold-eviction check for new
    /// keys, then applies the strategy's placement (new key) or reorder
    /// (existing key). Replacing a key keeps its hit count.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        self.set_with_hooks(key, value, ttl, EntryHooks::new());
    }

    /// [`set`](Cache::set) with per-entry hook overrides attached.
    pub fn set_with_hooks(&self, key: K, value: V, ttl: Duration, hooks: EntryHooks) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.closed {
            return;
        }

        state.hooks.fire_set(&key, &value, ttl);

        let existing = state.index.slot_of(&key);
        if existing.is_none()
            && state.strategy.evicts()
            && state.max_record_threshold > 0
            && state.eviction_batch_size > 0
            && state.index.len() >= state.max_record_threshold
        {
            state.evict_batch();
        }

        let expire_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };

        if let Some(id) = existing {
            if let Some(entry) = state.index.get_mut(id) {
                entry.value = value;
                entry.expire_at = expire_at;
                entry.hooks = hooks;
                // hit_count survives replacement
            }
            state.strategy.on_replace(&mut state.index, id);
            return;
        }

        let entry = Entry::new(key, value, expire_at, hooks);
        if state.strategy.inserts_at_front() {
            state.index.insert_front(entry);
        } else {
            state.index.insert_back(entry);
        }
    }

    /// Looks up `key`, applying the strategy's access reorder on a hit.
    ///
    /// On a hit the global get hooks fire, then the entry's own `on_get`.
    /// On a miss the global miss hooks fire and `None` is returned.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let Some(id) = state.index.slot_of(key) else {
            state.hooks.fire_miss(key);
            return None;
        };

        state.strategy.on_access(&mut state.index, id);

        let entry = state.index.get_mut(id)?;
        state.hooks.fire_get(&entry.key, &entry.value);
        if let Some(hook) = entry.hooks.on_get.as_mut() {
            hook();
        }
        Some(entry.value.clone())
    }

    /// Returns the first entry matching `predicate` in structural order.
    ///
    /// The scan holds the lock; the subsequent lookup re-acquires it through
    /// [`get`](Cache::get), so access reordering and get/miss hooks apply as
    /// usual. A concurrent delete between the two steps turns the match into
    /// a miss.
    pub fn get_func(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> Option<V> {
        let matched = {
            let state = self.state.lock();
            let matched = state
                .index
                .iter()
                .find(|entry| predicate(&entry.key, &entry.value))
                .map(|entry| entry.key.clone());
            matched
        };
        matched.and_then(|key| self.get(&key))
    }

    /// Removes `key`; returns whether it existed. Fires delete hooks.
    pub fn delete(&self, key: &K) -> bool {
        self.state.lock().remove_and_fire(key)
    }

    /// Removes every entry matching `predicate`; returns the count removed.
    /// Fires delete hooks per removed entry.
    pub fn delete_func(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> usize {
        let mut state = self.state.lock();
        let matched: Vec<K> = state
            .index
            .iter()
            .filter(|entry| predicate(&entry.key, &entry.value))
            .map(|entry| entry.key.clone())
            .collect();

        let mut removed = 0;
        for key in &matched {
            if state.remove_and_fire(key) {
                removed += 1;
            }
        }
        removed
    }

    /// Removes all entries and returns how many there were.
    ///
    /// Bulk removal: no delete hooks fire, per entry or global.
    pub fn flush(&self) -> usize {
        let mut state = self.state.lock();
        let count = state.index.len();
        state.index.clear();
        count
    }

    /// Returns all keys in structural order (front = next to evict).
    /// Snapshot copy, not a live view.
    pub fn keys(&self) -> Vec<K> {
        let state = self.state.lock();
        state.index.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Returns the keys matching `predicate`, in structural order.
    pub fn keys_func(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> Vec<K> {
        let state = self.state.lock();
        state
            .index
            .iter()
            .filter(|entry| predicate(&entry.key, &entry.value))
            .map(|entry| entry.key.clone())
            .collect()
    }

    /// Returns the number of entries. O(1).
    pub fn count(&self) -> usize {
        self.state.lock().index.len()
    }

    /// Returns the number of entries matching `predicate`. O(n).
    pub fn count_func(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> usize {
        let state = self.state.lock();
        state
            .index
            .iter()
            .filter(|entry| predicate(&entry.key, &entry.value))
            .count()
    }

    /// Registers a hook fired on every `set`, before insertion logic runs.
    pub fn add_on_set_hook(
        &self,
        hook: impl FnMut(&K, &V, Duration) + Send + 'static,
    ) -> HookId {
        self.state.lock().hooks.add_on_set(Box::new(hook))
    }

    /// Unregisters a set hook; returns whether the id existed.
    pub fn remove_on_set_hook(&self, id: HookId) -> bool {
        self.state.lock().hooks.remove_on_set(id)
    }

    /// Registers a hook fired on every successful `get`.
    pub fn add_on_get_hook(&self, hook: impl FnMut(&K, &V) + Send + 'static) -> HookId {
        self.state.lock().hooks.add_on_get(Box::new(hook))
    }

    /// Unregisters a get hook; returns whether the id existed.
    pub fn remove_on_get_hook(&self, id: HookId) -> bool {
        self.state.lock().hooks.remove_on_get(id)
    }

    /// Registers a hook fired on every failed `get`.
    pub fn add_on_miss_hook(&self, hook: impl FnMut(&K) + Send + 'static) -> HookId {
        self.state.lock().hooks.add_on_miss(Box::new(hook))
    }

    /// Unregisters a miss hook; returns whether the id existed.
    pub fn remove_on_miss_hook(&self, id: HookId) -> bool {
        self.state.lock().hooks.remove_on_miss(id)
    }

    /// Registers a hook fired on every delete and TTL expiry.
    pub fn add_on_delete_hook(&self, hook: impl FnMut(&K, &V) + Send + 'static) -> HookId {
        self.state.lock().hooks.add_on_delete(Box::new(hook))
    }

    /// Unregisters a delete hook; returns whether the id existed.
    pub fn remove_on_delete_hook(&self, id: HookId) -> bool {
        self.state.lock().hooks.remove_on_delete(id)
    }

    /// Shuts the cache down: clears all entries and hooks, signals the
    /// sweeper, and blocks until it has terminated. The signal wakes a
    /// sleeping sweeper immediately. Idempotent; also runs on `Drop`.
    pub fn close(&mut self) {
        let Some(handle) = self.sweeper.take() else {
            return;
        };
        {
            let mut state = self.state.lock();
            state.closed = true;
            state.index.clear();
            state.hooks.clear();
        }
        self.shutdown.signal();
        let _ = handle.join();
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        self.state.lock().index.debug_validate_invariants();
    }
}

impl<K, V> Drop for Cache<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    fn drop(&mut self) {
        self.close();
    }
}
