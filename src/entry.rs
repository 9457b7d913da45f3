//! Cache entry storage: key, value, hit counter, expiry, per-entry hooks.

use std::fmt;
use std::time::Instant;

/// Per-entry hook overrides, attached at insertion time.
///
/// Unlike the global hook tables on the cache, these closures take no
/// arguments: the entry they belong to is implied. They run synchronously
/// while the cache lock is held, global hooks first, and must not re-enter
/// the cache.
///
/// # Example
///
/// ```
/// use hookcache::EntryHooks;
///
/// let hooks = EntryHooks::new()
///     .on_get(|| println!("session read"))
///     .on_delete(|| println!("session gone"));
/// # let _ = hooks;
/// ```
#[derive(Default)]
pub struct EntryHooks {
    pub(crate) on_get: Option<Box<dyn FnMut() + Send>>,
    pub(crate) on_delete: Option<Box<dyn FnMut() + Send>>,
}

impl EntryHooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback fired after every successful get of this entry.
    pub fn on_get(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_get = Some(Box::new(hook));
        self
    }

    /// Sets the callback fired when this entry is deleted or expires.
    pub fn on_delete(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_delete = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for EntryHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHooks")
            .field("on_get", &self.on_get.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

/// A single cached record, exclusively owned by the ordered index.
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hit_count: u64,
    pub(crate) expire_at: Option<Instant>,
    pub(crate) hooks: EntryHooks,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, expire_at: Option<Instant>, hooks: EntryHooks) -> Self {
        Self {
            key,
            value,
            hit_count: 0,
            expire_at,
            hooks,
        }
    }

    /// Entries without an expiry never expire.
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        match self.expire_at {
            Some(at) => at <= now,
            None => false,
        }
    }
}
