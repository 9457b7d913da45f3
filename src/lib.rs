//! hookcache: an in-process key-value cache with replacement strategies,
//! per-entry TTL, and synchronous lifecycle hooks.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod cache;
pub mod ds;
pub mod entry;
pub mod error;
pub mod hooks;
pub mod policy;

pub mod prelude;

pub(crate) mod index;
pub(crate) mod sweeper;

pub use cache::{Cache, Config, DEFAULT_POLL_INTERVAL};
pub use entry::EntryHooks;
pub use error::ConfigError;
pub use hooks::HookId;
pub use policy::ReplacementStrategy;
