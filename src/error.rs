//! Error types.
//!
//! Lookups of missing keys are not errors; they return `None`. The only
//! fallible operations are the ones that accept configuration values:
//! [`FifoCache::try_init`](crate::FifoCache::try_init),
//! [`FifoCache::try_resize`](crate::FifoCache::try_resize) and
//! [`FifoCacheConfig::validate`](crate::config::FifoCacheConfig::validate).
//!
//! ```
//! use fifocache::config::FifoCacheConfig;
//! use fifocache::error::ConfigError;
//! use fifocache::FifoCache;
//! use core::num::NonZeroUsize;
//!
//! let config = FifoCacheConfig {
//!     track_on_read: true,
//!     handicap_factor: -1.0,
//!     ..FifoCacheConfig::new(NonZeroUsize::new(8).unwrap())
//! };
//! let err = FifoCache::<u32, u32>::try_init(config, None).unwrap_err();
//! assert_eq!(err, ConfigError::InvalidHandicapFactor(-1.0));
//! ```

/// Error returned when cache configuration parameters are invalid.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A capacity of zero was requested.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,
    /// The handicap factor is negative, NaN or infinite.
    #[error("handicap factor must be a finite non-negative number, got {0}")]
    InvalidHandicapFactor(f64),
}
