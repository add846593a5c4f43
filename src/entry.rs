//! Cache Entry
//!
//! The cache keeps a single map `K -> CacheEntry<V>`. Each entry carries the
//! value together with the [`Locator`] of the key's element in the priority
//! queue, so the entry store and the locator index are one structure: a key is
//! either present with both, or absent with neither.

use crate::heap::Locator;

/// Value stored for a key, plus the handle of its priority record.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    /// The cached value
    pub(crate) value: V,

    /// Handle of the key's element in the priority queue
    pub(crate) locator: Locator,
}

impl<V> CacheEntry<V> {
    #[inline]
    pub(crate) fn new(value: V, locator: Locator) -> Self {
        Self { value, locator }
    }
}
