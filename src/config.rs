//! Cache Configuration
//!
//! [`FifoCacheConfig`] selects the eviction behaviour of a
//! [`FifoCache`](crate::FifoCache). Like the other configuration structs in
//! this crate family it has public fields and no builder: start from
//! [`FifoCacheConfig::new`] and override what you need with struct update
//! syntax.
//!
//! # Policy Selection
//!
//! | `track_on_insert` | `track_on_read` | `handicap_factor` | Behaviour |
//! |-------------------|-----------------|-------------------|-----------|
//! | `false` | `false` | any | Pure FIFO: oldest untouched entry is evicted |
//! | `true` and/or | `true` | `0.0` | Frequency: touches raise priority, new entries start at 1 |
//! | `true` and/or | `true` | `> 0.0` | Handicap: new entries start at `factor × min priority` |
//!
//! A factor above `1.0` gives fresh entries a head start over the coldest
//! resident entry, so a full cache keeps admitting newcomers instead of
//! evicting them before they are ever read.
//!
//! # Examples
//!
//! ```
//! use fifocache::config::FifoCacheConfig;
//! use fifocache::FifoCache;
//! use core::num::NonZeroUsize;
//!
//! // Read-weighted cache that protects new entries
//! let config = FifoCacheConfig {
//!     track_on_read: true,
//!     handicap_factor: 2.0,
//!     ..FifoCacheConfig::new(NonZeroUsize::new(1000).unwrap())
//! };
//! let cache: FifoCache<String, Vec<u8>> = FifoCache::init(config, None);
//! assert_eq!(cache.cap().get(), 1000);
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for a [`FifoCache`](crate::FifoCache).
///
/// # Fields
///
/// - `capacity`: Maximum number of entries
/// - `track_on_insert`: Re-inserting an existing key touches it
/// - `track_on_read`: A successful `get` touches the key
/// - `handicap_factor`: Multiplier applied to the current minimum priority for
///   new admissions; `0.0` means new entries always start at priority 1
#[derive(Clone, Copy, PartialEq)]
pub struct FifoCacheConfig {
    /// Maximum number of key-value pairs the cache can hold
    pub capacity: NonZeroUsize,
    /// Whether `put` on an existing key raises its priority
    pub track_on_insert: bool,
    /// Whether `get` on an existing key raises its priority
    pub track_on_read: bool,
    /// Starting-priority multiplier for new entries. Must be finite and non-negative.
    pub handicap_factor: f64,
}

impl FifoCacheConfig {
    /// Creates a pure FIFO configuration with the given capacity.
    pub const fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            track_on_insert: false,
            track_on_read: false,
            handicap_factor: 0.0,
        }
    }

    /// Checks that the handicap factor is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.handicap_factor.is_finite() || self.handicap_factor < 0.0 {
            return Err(ConfigError::InvalidHandicapFactor(self.handicap_factor));
        }
        Ok(())
    }

    /// Returns `true` when neither insertions nor reads are tracked.
    ///
    /// Priorities then only change through manual touches.
    #[inline]
    pub fn is_pure_fifo(&self) -> bool {
        !self.track_on_insert && !self.track_on_read
    }
}

impl fmt::Debug for FifoCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCacheConfig")
            .field("capacity", &self.capacity)
            .field("track_on_insert", &self.track_on_insert)
            .field("track_on_read", &self.track_on_read)
            .field("handicap_factor", &self.handicap_factor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_config_defaults() {
        let config = FifoCacheConfig::new(NonZeroUsize::new(100).unwrap());
        assert_eq!(config.capacity.get(), 100);
        assert!(!config.track_on_insert);
        assert!(!config.track_on_read);
        assert_eq!(config.handicap_factor, 0.0);
        assert!(config.is_pure_fifo());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fifo_config_tracking() {
        let config = FifoCacheConfig {
            track_on_read: true,
            handicap_factor: 1.5,
            ..FifoCacheConfig::new(NonZeroUsize::new(10).unwrap())
        };
        assert!(!config.is_pure_fifo());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fifo_config_rejects_bad_factor() {
        for factor in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = FifoCacheConfig {
                handicap_factor: factor,
                ..FifoCacheConfig::new(NonZeroUsize::new(10).unwrap())
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidHandicapFactor(_))
            ));
        }
    }
}
