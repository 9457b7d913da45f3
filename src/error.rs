//! Error types for the hookcache library.
//!
//! The runtime API is infallible by design (misses are `None`, deletes are
//! `bool`); only configuration can fail, and only through the validating
//! constructor.
//!
//! ## Example Usage
//!
//! ```
//! use hookcache::error::ConfigError;
//! use hookcache::{Cache, Config, ReplacementStrategy};
//!
//! let bad: Result<Cache<u64, u64>, ConfigError> = Config {
//!     strategy: ReplacementStrategy::Lru,
//!     max_record_threshold: 100,
//!     eviction_batch_size: 0,
//!     ..Config::default()
//! }
//! .try_build();
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when cache configuration parameters are incoherent.
///
/// Produced by [`Config::try_build`](crate::Config::try_build). Carries a
/// human-readable description of which parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_message() {
        let err = ConfigError::new("eviction_batch_size must be > 0");
        assert_eq!(err.to_string(), err.message());
    }
}
