pub use crate::cache::{Cache, Config, DEFAULT_POLL_INTERVAL};
pub use crate::ds::{LinkedList, SlotArena, SlotId};
pub use crate::entry::EntryHooks;
pub use crate::error::ConfigError;
pub use crate::hooks::HookId;
pub use crate::policy::ReplacementStrategy;
