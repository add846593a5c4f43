//! Concurrent Cache Implementations
//!
//! Thread-safe wrappers around the single-threaded caches, built on
//! `parking_lot::Mutex`.
//!
//! # Architecture
//!
//! [`ConcurrentFifoCache`] guards one [`FifoCache`](crate::FifoCache) segment
//! with one lock. Eviction picks the global minimum priority, and splitting the
//! key space into independently evicting shards would change which key goes
//! next, so the cache is not sharded.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! With read tracking enabled every `get()` raises a priority and moves an
//! element in the priority queue, so reads need exclusive access just like
//! writes. `RwLock` would add bookkeeping without letting readers overlap.
//!
//! # Zero-Copy Access
//!
//! `get()` clones the value so the lock is released before the caller uses it.
//! Use `get_with()` to work on the value while the lock is held:
//!
//! ```rust
//! use fifocache::concurrent::ConcurrentFifoCache;
//! use core::num::NonZeroUsize;
//!
//! let cache: ConcurrentFifoCache<&str, String> =
//!     ConcurrentFifoCache::new(NonZeroUsize::new(8).unwrap());
//! cache.put("greeting", "hello world".to_string());
//!
//! assert_eq!(cache.get_with(&"greeting", |value| value.len()), Some(11));
//! ```

mod fifo;

pub use self::fifo::ConcurrentFifoCache;
