//! Background TTL sweeper.
//!
//! One thread per cache, started at construction. Each wake acquires the
//! cache lock, scans all entries, and removes those whose expiry has passed,
//! firing delete hooks per removed entry. The scan is O(n) per wake and runs
//! off the request path.
//!
//! Shutdown is cooperative: [`Shutdown::signal`] flips a flag under the same
//! condvar the sweeper sleeps on, so a sleeping sweeper wakes immediately and
//! a scanning one observes the flag at its next wait. `close` joins the
//! thread, guaranteeing no background activity survives it.

use std::hash::Hash;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::cache::CacheState;

/// One-shot cancellation token shared between the cache and its sweeper.
#[derive(Clone)]
pub(crate) struct Shutdown {
    inner: Arc<ShutdownInner>,
}

struct ShutdownInner {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl Shutdown {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(ShutdownInner {
                stopped: Mutex::new(false),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Requests termination and wakes the sweeper if it is sleeping.
    pub(crate) fn signal(&self) {
        let mut stopped = self.inner.stopped.lock();
        *stopped = true;
        self.inner.condvar.notify_all();
    }

    /// Sleeps up to `timeout`; returns `true` once shutdown was signalled.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut stopped = self.inner.stopped.lock();
        if *stopped {
            return true;
        }
        self.inner.condvar.wait_for(&mut stopped, timeout);
        *stopped
    }
}

pub(crate) fn spawn<K, V>(
    state: Arc<Mutex<CacheState<K, V>>>,
    poll_interval: Duration,
    shutdown: Shutdown,
) -> JoinHandle<()>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    thread::spawn(move || loop {
        if shutdown.wait_timeout(poll_interval) {
            return;
        }
        let mut state = state.lock();
        state.sweep_expired(Instant::now());
    })
}
